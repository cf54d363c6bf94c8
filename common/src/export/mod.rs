//! Export core modules shared by the document and tabular writers.

pub mod csv_core;
pub mod document_core;
pub mod labels;

pub use csv_core::{build_csv_rows, build_csv_text, CSV_FILE_NAME};
pub use document_core::{DocumentLayout, TextAlign, TextPlacement, PDF_FILE_NAME};
pub use labels::ReportLabels;

/// 比率を "NN.NN%" に整形
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
