//! Printable HTML report. Browsers print it to PDF on load.

use html_escape::encode_text;
use serde::Serialize;
use serde_json::Value;

use crate::constants::{REPORT_COLUMN_WIDTH_PX, REPORT_MAX_WIDTH_PX, REPORT_MIN_WIDTH_PX};
use crate::labels::LabelFormatter;

use super::cell::format_cell;

const REPORT_TITLE: &str = "República de Honduras - Secretaría de Salud";

const REPORT_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: Arial, sans-serif; margin: 0; padding: 15px; background: white; }
.header { margin-bottom: 20px; page-break-inside: avoid; text-align: center; border-bottom: 2px solid #000; padding-bottom: 15px; }
h1 { color: #000; margin: 0 0 8px 0; font-size: 22px; font-weight: bold; letter-spacing: 1px; }
h2 { color: #000; margin: 0 0 6px 0; font-size: 18px; font-weight: bold; }
h3 { color: #000; margin: 0 0 15px 0; font-size: 16px; font-weight: normal; }
.meta { color: #000; font-size: 10px; margin-bottom: 10px; line-height: 1.4; text-align: center; }
.table-container { overflow-x: auto; width: 100%; border: 1px solid #d1d5db; border-radius: 4px; }
table { width: 100%; border-collapse: collapse; table-layout: auto; font-size: 9px; }
th, td { border: 1px solid #d1d5db; padding: 4px 6px; text-align: left; vertical-align: top; word-wrap: break-word; }
th { background-color: #f9fafb; font-weight: bold; font-size: 8px; }
.total-row { background-color: #f3f4f6; font-weight: bold; }
.table-wrapper { width: 100%; }
.table-wrapper.scaled { transform-origin: top left; }
.table-wrapper table { width: 100%; }
@media print {
  @page { size: A4 landscape; margin: 0.5in; }
  body { margin: 0; padding: 10px; font-size: 8px; }
  .header { margin-bottom: 15px; padding-bottom: 10px; }
  .table-container { overflow: visible; }
  th, td { padding: 2px 4px; font-size: 7px; border: 1px solid #999; }
  th { font-size: 6px; }
  tr { page-break-inside: avoid; }
}
@media screen {
  .table-container { max-height: 80vh; overflow: auto; }
}
"#;

const PRINT_SCRIPT: &str = "window.onload = function() { setTimeout(function() { window.print(); window.onafterprint = function() { window.close(); }; }, 1000); };";

/// Context printed under the report header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportMeta {
    pub generated_at: String,
    pub total_records: usize,
    pub years: Vec<i32>,
}

/// Reference width of the table in pixels: 120 per column, never below 800.
pub fn report_width(columns: usize) -> u32 {
    let columns = u32::try_from(columns).unwrap_or(u32::MAX);
    columns
        .saturating_mul(REPORT_COLUMN_WIDTH_PX)
        .max(REPORT_MIN_WIDTH_PX)
}

/// Scale factor that fits `width` into the printable page.
pub fn report_scale(width: u32) -> f64 {
    if width > REPORT_MAX_WIDTH_PX {
        f64::from(REPORT_MAX_WIDTH_PX) / f64::from(width)
    } else {
        1.0
    }
}

pub fn render_table_html(
    headers: &[String],
    body: &[Vec<Value>],
    totals: &[Value],
    formatter: &LabelFormatter,
) -> String {
    let mut html = String::from("<table><thead><tr>");
    for header in headers {
        html.push_str("<th>");
        html.push_str(&encode_text(&formatter.format(header)));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for row in body {
        html.push_str("<tr>");
        push_cells(&mut html, row);
        html.push_str("</tr>");
    }
    html.push_str("</tbody>");

    if !totals.is_empty() {
        html.push_str("<tfoot><tr class=\"total-row\">");
        push_cells(&mut html, totals);
        html.push_str("</tr></tfoot>");
    }

    html.push_str("</table>");
    html
}

fn push_cells(html: &mut String, cells: &[Value]) {
    for cell in cells {
        html.push_str("<td>");
        html.push_str(&encode_text(&format_cell(cell)));
        html.push_str("</td>");
    }
}

pub fn render_report(
    headers: &[String],
    body: &[Vec<Value>],
    totals: &[Value],
    meta: Option<&ExportMeta>,
    formatter: &LabelFormatter,
) -> String {
    let table = render_table_html(headers, body, totals, formatter);
    let scale = report_scale(report_width(headers.len()));
    let (wrapper_class, wrapper_style) = if scale < 1.0 {
        (
            "table-wrapper scaled",
            format!(
                "transform: scale({scale:.4}); transform-origin: top left; width: {:.2}%;",
                100.0 / scale
            ),
        )
    } else {
        ("table-wrapper", String::new())
    };

    let generated_at = meta
        .map(|meta| meta.generated_at.as_str())
        .filter(|generated_at| !generated_at.is_empty())
        .unwrap_or("N/A");
    let total_records = meta.map(|meta| meta.total_records).unwrap_or(0);
    let years = meta
        .map(|meta| {
            meta.years
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|years| !years.is_empty())
        .unwrap_or_else(|| "N/D".to_string());

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{REPORT_TITLE}</title>\
         <style>{REPORT_STYLES}</style></head><body>\
         <div class=\"header\"><h1>REPUBLICA DE HONDURAS</h1><h2>SECRETARIA DE SALUD</h2>\
         <h3>DEPARTAMENTO DE ESTADÍSTICA</h3>\
         <div class=\"meta\">Generado en: {generated_at} | Total de registros: {total_records} | Años consultados: {years}</div>\
         </div><div class=\"table-container\"><div class=\"{wrapper_class}\" style=\"{wrapper_style}\">{table}</div></div>\
         <script>{PRINT_SCRIPT}</script></body></html>",
        generated_at = encode_text(generated_at),
    )
}
