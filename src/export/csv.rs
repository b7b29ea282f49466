use rayon::prelude::*;
use serde_json::Value;

use crate::labels::LabelFormatter;

use super::cell::format_cell;

/// Render the table as CSV: display headers, formatted cells and, when present,
/// the totals row. Every cell is quoted.
pub fn render_csv(
    headers: &[String],
    body: &[Vec<Value>],
    totals: &[Value],
    formatter: &LabelFormatter,
) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(body.len() + 2);
    rows.push(formatter.format_all(headers));

    let formatted_body: Vec<Vec<String>> = body
        .par_iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();
    rows.extend(formatted_body);

    if !totals.is_empty() {
        rows.push(totals.iter().map(format_cell).collect());
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| quote(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
