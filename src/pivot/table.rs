use serde_json::Value;

use crate::labels::LabelFormatter;

use super::types::PivotQueryResult;

/// Label placed in the first row-dimension column of the totals row.
const TOTALS_LABEL: &str = "Total";

/// Tabular view of a pivot result: raw column identifiers, one row per datum
/// and an optional grand-total row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub headers: Vec<String>,
    pub body: Vec<Vec<Value>>,
    pub totals: Vec<Value>,
}

impl PivotTable {
    pub fn from_result(result: &PivotQueryResult) -> Self {
        let row_dimensions = &result.metadata.dimensiones_filas;

        let mut headers: Vec<String> = row_dimensions.clone();
        for record in &result.datos {
            for key in record.keys() {
                if !headers.iter().any(|header| header == key) {
                    headers.push(key.clone());
                }
            }
        }

        let body = result
            .datos
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|header| record.get(header).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        let totals = match &result.total_general {
            None => Vec::new(),
            Some(total) => headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    if let Some(value) = total.get(header) {
                        value.clone()
                    } else if row_dimensions.contains(header) {
                        let label = if index == 0 { TOTALS_LABEL } else { "" };
                        Value::String(label.to_string())
                    } else {
                        Value::Null
                    }
                })
                .collect(),
        };

        Self {
            headers,
            body,
            totals,
        }
    }

    pub fn display_headers(&self, formatter: &LabelFormatter) -> Vec<String> {
        formatter.format_all(&self.headers)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Position of a column, matched on its raw identifier or display label.
    pub fn column_index(&self, name: &str, formatter: &LabelFormatter) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .or_else(|| {
                let wanted = formatter.format(name);
                self.headers
                    .iter()
                    .position(|header| formatter.format(header) == wanted)
            })
    }
}
