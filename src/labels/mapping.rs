use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Builtin code → label pairs for the health statistics dataset.
const BUILTIN_LABELS: [(&str, &str); 17] = [
    // measures
    ("Q_AT_ENFERMERA_AUX", "Enfermeras Auxiliares"),
    ("Q_AT_ENFERMERA_PRO", "Enfermeras Profesionales"),
    ("Q_AT_MEDICO_GEN", "Médicos Generales"),
    ("Q_AT_MEDICO_ESP", "Médicos Especialistas"),
    ("MES", "Mes"),
    ("TOTAL", "Total"),
    ("SUMA", "Total"),
    // dimensions
    ("REGION", "Región"),
    ("MUNICIPIO", "Municipio"),
    ("DEPARTAMENTO", "Departamento"),
    ("ESTABLECIMIENTO", "Establecimiento de Salud"),
    ("NIVEL_ESTABLECIMIENTO", "Nivel de Establecimiento de Salud"),
    ("NIVEL_OPERATIVO", "Nivel Operativo"),
    ("GRUPO_ESPECIAL", "Grupo Especial"),
    ("SERVICIO", "Servicio"),
    ("CONCEPTO", "Concepto"),
    ("FORMULARIO", "Formulario"),
];

/// Normalized lookup key: uppercase, whitespace runs joined with `_`.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// Immutable table of technical codes and their display labels.
///
/// Built once (builtin entries plus optional deployment overrides) and shared
/// read-only by every formatter clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: HashMap<String, String>,
}

impl LabelMap {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_LABELS)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(code, label)| (normalize_key(code.as_ref()), label.into()))
            .filter(|(code, _)| !code.is_empty())
            .collect();
        Self { entries }
    }

    /// Parse a JSON object of `"CODE": "Label"` pairs.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let raw: HashMap<String, String> =
            serde_json::from_str(source).context("label file must be a JSON object of strings")?;
        if let Some(code) = raw.keys().find(|code| normalize_key(code).is_empty()) {
            bail!("label file contains an empty code {code:?}");
        }
        Ok(Self::from_pairs(raw))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read label file {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("invalid label file {}", path.display()))
    }

    /// Builtin table overridden by the entries of `overrides`.
    pub fn with_overrides(mut self, overrides: LabelMap) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Lookup by already-normalized key.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Lookup after normalizing `raw`.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.get(&normalize_key(raw))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spaces_and_case() {
        assert_eq!(normalize_key("  nivel   operativo "), "NIVEL_OPERATIVO");
        assert_eq!(normalize_key("región"), "REGIÓN");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn builtin_contains_measures_and_dimensions() {
        let map = LabelMap::builtin();
        assert_eq!(map.len(), BUILTIN_LABELS.len());
        assert_eq!(map.get("Q_AT_MEDICO_GEN"), Some("Médicos Generales"));
        assert_eq!(map.lookup("grupo especial"), Some("Grupo Especial"));
        assert_eq!(map.get("UNKNOWN"), None);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let overrides =
            LabelMap::from_json_str(r#"{"total": "Gran Total", "q at vih": "Atenciones VIH"}"#)
                .expect("valid overrides");
        let map = LabelMap::builtin().with_overrides(overrides);

        assert_eq!(map.get("TOTAL"), Some("Gran Total"));
        assert_eq!(map.get("Q_AT_VIH"), Some("Atenciones VIH"));
        assert_eq!(map.get("REGION"), Some("Región"));
    }

    #[test]
    fn rejects_malformed_label_files() {
        assert!(LabelMap::from_json_str("[1, 2]").is_err());
        assert!(LabelMap::from_json_str(r#"{"  ": "Nada"}"#).is_err());
        assert!(LabelMap::from_json_str(r#"{"MES": 3}"#).is_err());
    }
}
