//! CSVレポート生成
//!
//! 結果がない（失敗含む）ときは何も書かずに Ok(None)。

use super::FileSink;
use crate::error::Result;
use medscan_common::export::{build_csv_text, CSV_FILE_NAME};
use medscan_common::{AnalysisKind, AnalysisOutcome, ReportLabels};
use std::path::PathBuf;
use tracing::debug;

pub fn export_csv(
    outcome: Option<&AnalysisOutcome>,
    kind: AnalysisKind,
    labels: &ReportLabels,
    date: &str,
    sink: &mut dyn FileSink,
) -> Result<Option<PathBuf>> {
    let Some(text) = build_csv_text(outcome, kind, labels, date) else {
        debug!("解析結果がないためCSV出力をスキップ");
        return Ok(None);
    };
    let path = sink.save(CSV_FILE_NAME, text.as_bytes())?;
    Ok(Some(path))
}
