//! Table exports: CSV files and the printable HTML report.

mod cell;
mod csv;
mod report;

use chrono::NaiveDate;

use crate::constants::EXPORT_FILE_PREFIX;

pub use cell::{format_cell, format_number, EMPTY_CELL};
pub use csv::render_csv;
pub use report::{render_report, render_table_html, report_scale, report_width, ExportMeta};

/// Dated export file name, e.g. `tabla_dinamica_2025-03-14.csv`.
pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.{extension}", date.format("%Y-%m-%d"))
}
