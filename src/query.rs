use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::json;

use crate::config::ClientConfig;
use crate::export::{export_file_name, format_cell, render_csv, render_report, ExportMeta};
use crate::labels::LabelFormatter;
use crate::logging;
use crate::pivot::types::{PivotFilter, PivotQueryPayload, PivotValueRequest, QueryResponse};
use crate::pivot::{PivotClient, PivotTable};

/// Query description shared by `query` and `chart`.
#[derive(Debug, Args, Clone, Default)]
pub struct QueryInput {
    /// JSON payload file sent as-is instead of the flags below
    #[arg(long, conflicts_with_all = ["year", "rows", "columns", "values", "filters", "limit", "no_totals"])]
    pub payload: Option<PathBuf>,

    /// Year to query
    #[arg(long)]
    pub year: Option<i32>,

    /// Row dimensions, comma separated
    #[arg(long, value_delimiter = ',')]
    pub rows: Vec<String>,

    /// Column dimensions, comma separated
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Measure as FIELD or FIELD:AGG (SUM, AVG, COUNT, MAX, MIN); repeatable
    #[arg(long = "value")]
    pub values: Vec<PivotValueRequest>,

    /// Filter as FIELD=V1,V2; repeatable
    #[arg(long = "filter")]
    pub filters: Vec<PivotFilter>,

    /// Maximum number of result rows
    #[arg(long)]
    pub limit: Option<u32>,

    /// Skip the grand-total row
    #[arg(long)]
    pub no_totals: bool,
}

impl QueryInput {
    pub fn payload(&self) -> Result<PivotQueryPayload> {
        if let Some(path) = &self.payload {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read payload {}", path.display()))?;
            return serde_json::from_str(&source)
                .with_context(|| format!("invalid payload {}", path.display()));
        }

        if self.values.is_empty() {
            bail!("at least one --value measure is required");
        }

        Ok(PivotQueryPayload {
            year: self.year,
            filters: non_empty(self.filters.clone()),
            rows: non_empty(self.rows.clone()),
            columns: non_empty(self.columns.clone()),
            values: self.values.clone(),
            limit: self.limit,
            include_totals: Some(!self.no_totals),
        })
    }

    pub async fn execute(&self, config: &ClientConfig) -> Result<QueryResponse> {
        let payload = self.payload()?;
        let client = PivotClient::new(config)?;
        let response = client.query(&payload).await?;
        logging::info(
            "query_completed",
            "pivot query returned",
            logging::metadata_from_pairs(&[
                ("rows", json!(response.resultado.datos.len())),
                ("years", json!(response.resultado.anios_consultados)),
                ("generated_at", json!(response.generado_en)),
            ]),
        );
        Ok(response)
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub input: QueryInput,

    /// Write a CSV export to this file or directory
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write a printable HTML report to this file or directory
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not print the table to stdout
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run(args: QueryArgs, config: &ClientConfig, formatter: &LabelFormatter) -> Result<()> {
    let response = args.input.execute(config).await?;
    let table = PivotTable::from_result(&response.resultado);

    if table.is_empty() {
        logging::warn(
            "query_empty",
            "pivot query returned no rows",
            logging::metadata_object(),
        );
    }

    if !args.quiet {
        print!("{}", render_text_table(&table, formatter));
    }

    let today = chrono::Local::now().date_naive();

    if let Some(path) = &args.csv {
        let path = resolve_output(path, &export_file_name(today, "csv"));
        let csv = render_csv(&table.headers, &table.body, &table.totals, formatter);
        write_export(&path, &csv)?;
    }

    if let Some(path) = &args.report {
        let path = resolve_output(path, &export_file_name(today, "html"));
        let meta = ExportMeta {
            generated_at: response.generado_en.clone(),
            total_records: response.resultado.datos.len(),
            years: response.resultado.anios_consultados.clone(),
        };
        let report = render_report(
            &table.headers,
            &table.body,
            &table.totals,
            Some(&meta),
            formatter,
        );
        write_export(&path, &report)?;
    }

    Ok(())
}

/// A directory target receives the dated default file name.
pub fn resolve_output(path: &Path, default_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(default_name)
    } else {
        path.to_path_buf()
    }
}

fn write_export(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write export {}", path.display()))?;
    logging::info(
        "export_written",
        "export file written",
        logging::metadata_from_pairs(&[
            ("path", json!(path.display().to_string())),
            ("bytes", json!(contents.len())),
        ]),
    );
    Ok(())
}

/// Column-aligned plain text rendering of the table.
pub fn render_text_table(table: &PivotTable, formatter: &LabelFormatter) -> String {
    let headers = table.display_headers(formatter);
    let mut rows: Vec<Vec<String>> = table
        .body
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();
    if !table.totals.is_empty() {
        rows.push(table.totals.iter().map(format_cell).collect());
    }

    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render_row(&headers));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    let body_len = table.body.len();
    for (index, row) in rows.iter().enumerate() {
        if index == body_len && index > 0 {
            out.push_str(&"=".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
            out.push('\n');
        }
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pivot::types::Aggregation;

    #[test]
    fn flags_build_a_payload() {
        let input = QueryInput {
            year: Some(2024),
            rows: vec!["REGION".into()],
            values: vec!["Q_AT_MEDICO_GEN:SUM".parse().expect("measure")],
            ..QueryInput::default()
        };

        let payload = input.payload().expect("payload");
        assert_eq!(payload.year, Some(2024));
        assert_eq!(payload.rows, Some(vec!["REGION".to_string()]));
        assert_eq!(payload.columns, None);
        assert_eq!(payload.filters, None);
        assert_eq!(payload.values[0].aggregation, Some(Aggregation::Sum));
        assert_eq!(payload.include_totals, Some(true));
    }

    #[test]
    fn measures_are_required_without_payload_file() {
        let err = QueryInput::default().payload().expect_err("missing measures");
        assert!(err.to_string().contains("--value"));
    }

    #[test]
    fn payload_file_is_read_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.json");
        std::fs::write(
            &path,
            r#"{"columns": ["MES"], "values": [{"field": "TOTAL"}], "limit": 50}"#,
        )
        .expect("write payload");

        let input = QueryInput {
            payload: Some(path),
            ..QueryInput::default()
        };
        let payload = input.payload().expect("payload");
        assert_eq!(payload.columns, Some(vec!["MES".to_string()]));
        assert_eq!(payload.limit, Some(50));
        assert_eq!(payload.include_totals, None);
    }

    #[test]
    fn directories_receive_the_default_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            resolve_output(dir.path(), "tabla.csv"),
            dir.path().join("tabla.csv")
        );
        let file = dir.path().join("custom.csv");
        assert_eq!(resolve_output(&file, "tabla.csv"), file);
    }

    #[test]
    fn text_table_aligns_columns_and_separates_totals() {
        let table = PivotTable {
            headers: vec!["REGION".into(), "TOTAL".into()],
            body: vec![vec![json!("NORTE"), json!(1520)], vec![json!("SUR"), json!(8)]],
            totals: vec![json!("Total"), json!(1528)],
        };

        let text = render_text_table(&table, &LabelFormatter::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Región | Total");
        assert_eq!(lines[1], "-------+------");
        assert_eq!(lines[2], "NORTE  | 1,520");
        assert_eq!(lines[3], "SUR    | 8");
        assert_eq!(lines[4], "==============");
        assert_eq!(lines[5], "Total  | 1,528");
    }
}
