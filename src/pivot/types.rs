use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row or the grand total, keyed by column identifier.
pub type Record = Map<String, Value>;

/// Value type of a catalog dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionType {
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Max,
    Min,
}

impl Aggregation {
    pub const ALL: [Aggregation; 5] = [
        Aggregation::Sum,
        Aggregation::Avg,
        Aggregation::Count,
        Aggregation::Max,
        Aggregation::Min,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
            Aggregation::Max => "MAX",
            Aggregation::Min => "MIN",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Aggregation::ALL
            .into_iter()
            .find(|aggregation| aggregation.as_str() == upper)
            .ok_or_else(|| anyhow!("unknown aggregation {s:?}; expected SUM, AVG, COUNT, MAX or MIN"))
    }
}

/// Filter or dimension value; the API mixes numeric and textual codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Number(number) => write!(f, "{number}"),
            ScalarValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub valor: ScalarValue,
    pub etiqueta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDimension {
    pub id: String,
    pub etiqueta: String,
    pub tipo: DimensionType,
    pub admite_filtrado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valores: Option<Vec<FilterOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_valores: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_valores: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeasure {
    pub id: String,
    pub etiqueta: String,
    pub descripcion: String,
    pub agregacion_por_defecto: Aggregation,
}

/// Dimensions and measures the API can pivot on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotCatalog {
    pub dimensiones: Vec<CatalogDimension>,
    pub medidas: Vec<CatalogMeasure>,
    pub actualizado_en: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotValueRequest {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

/// Parses `FIELD` or `FIELD:AGG` as written on the command line.
impl FromStr for PivotValueRequest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, aggregation) = match s.split_once(':') {
            Some((field, aggregation)) => (field, Some(aggregation.parse()?)),
            None => (s, None),
        };
        let field = field.trim();
        if field.is_empty() {
            bail!("measure field must not be empty in {s:?}");
        }
        Ok(Self {
            field: field.to_string(),
            aggregation,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotFilter {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ScalarValue>>,
}

/// Parses `FIELD=V1,V2`; a bare `FIELD` filters on nothing.
impl FromStr for PivotFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, values) = match s.split_once('=') {
            Some((field, values)) => {
                let values = values
                    .split(',')
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(|value| ScalarValue::Text(value.to_string()))
                    .collect();
                (field, Some(values))
            }
            None => (s, None),
        };
        let field = field.trim();
        if field.is_empty() {
            bail!("filter field must not be empty in {s:?}");
        }
        Ok(Self {
            field: field.to_string(),
            values,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotQueryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<PivotFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    pub values: Vec<PivotValueRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_totals: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryMetadata {
    pub dimensiones_seleccionadas: Vec<String>,
    pub dimensiones_filas: Vec<String>,
    pub dimensiones_columnas: Vec<String>,
    pub medidas_seleccionadas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotQueryResult {
    pub datos: Vec<Record>,
    #[serde(default)]
    pub total_general: Option<Record>,
    #[serde(default)]
    pub anios_consultados: Vec<i32>,
    #[serde(default)]
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub resultado: PivotQueryResult,
    pub generado_en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionValuesResponse {
    pub valores: Vec<FilterOption>,
    pub generado_en: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_deserializes_from_sample() {
        let json = r#"{
            "dimensiones": [
                {"id": "REGION", "etiqueta": "Región", "tipo": "string", "admiteFiltrado": true,
                 "valores": [{"valor": 1, "etiqueta": "Región 1"}, {"valor": "02", "etiqueta": "Región 2"}],
                 "totalValores": 20}
            ],
            "medidas": [
                {"id": "Q_AT_MEDICO_GEN", "etiqueta": "Médicos", "descripcion": "Atenciones",
                 "agregacionPorDefecto": "SUM"}
            ],
            "actualizadoEn": "2025-01-31T10:00:00Z"
        }"#;

        let catalog: PivotCatalog = serde_json::from_str(json).expect("valid catalog");
        let region = &catalog.dimensiones[0];
        assert_eq!(region.tipo, DimensionType::String);
        assert_eq!(region.total_valores, Some(20));
        assert_eq!(region.endpoint_valores, None);
        let values = region.valores.as_ref().expect("inline values");
        assert_eq!(values[0].valor.to_string(), "1");
        assert_eq!(values[1].valor, ScalarValue::Text("02".into()));
        assert_eq!(catalog.medidas[0].agregacion_por_defecto, Aggregation::Sum);
    }

    #[test]
    fn payload_omits_absent_fields() {
        let payload = PivotQueryPayload {
            year: Some(2024),
            rows: Some(vec!["REGION".into()]),
            values: vec!["Q_AT_MEDICO_GEN:sum".parse().expect("measure")],
            include_totals: Some(true),
            ..PivotQueryPayload::default()
        };

        let json = serde_json::to_string(&payload).expect("serialize");
        assert_eq!(
            json,
            r#"{"year":2024,"rows":["REGION"],"values":[{"field":"Q_AT_MEDICO_GEN","aggregation":"SUM"}],"includeTotals":true}"#
        );
    }

    #[test]
    fn parses_command_line_measures_and_filters() {
        let plain: PivotValueRequest = "TOTAL".parse().expect("plain measure");
        assert_eq!(plain.aggregation, None);
        assert!("TOTAL:MEDIAN".parse::<PivotValueRequest>().is_err());
        assert!(":SUM".parse::<PivotValueRequest>().is_err());

        let filter: PivotFilter = "DEPARTAMENTO=01, 02,".parse().expect("filter");
        assert_eq!(filter.field, "DEPARTAMENTO");
        assert_eq!(
            filter.values,
            Some(vec![ScalarValue::Text("01".into()), ScalarValue::Text("02".into())])
        );
    }

    #[test]
    fn query_result_tolerates_missing_metadata() {
        let json = r#"{"datos": [{"REGION": "NORTE", "TOTAL": 12}], "totalGeneral": null}"#;
        let result: PivotQueryResult = serde_json::from_str(json).expect("valid result");
        assert_eq!(result.datos.len(), 1);
        assert!(result.total_general.is_none());
        assert!(result.metadata.dimensiones_filas.is_empty());
    }
}
