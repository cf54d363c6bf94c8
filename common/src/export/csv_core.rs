//! CSV（表形式）レポートの行構築
//!
//! 行の並びは固定。結果がない（または失敗）ときは None を返し、
//! 呼び出し側は何も書き出さない。

use super::format_percent;
use super::labels::ReportLabels;
use crate::kind::AnalysisKind;
use crate::types::AnalysisOutcome;

/// 出力ファイル名（固定）
pub const CSV_FILE_NAME: &str = "tibbi-goruntu-analizi-sonuclari.csv";

/// 出力行を構築（結果なし → None）
pub fn build_csv_rows(
    outcome: Option<&AnalysisOutcome>,
    kind: AnalysisKind,
    labels: &ReportLabels,
    date: &str,
) -> Option<Vec<Vec<String>>> {
    let result = outcome?.result()?;
    let probabilities = &result.all_probabilities;

    Some(vec![
        vec![labels.table_title.clone()],
        vec![labels.date.clone(), date.to_string()],
        vec![String::new()],
        vec![labels.analysis_type.clone(), kind.title().to_string()],
        vec![
            labels.verdict.clone(),
            labels.verdict_text(result.tumor_detected).to_string(),
        ],
        vec![labels.confidence.clone(), format_percent(result.confidence)],
        vec![String::new()],
        vec![labels.probabilities.clone()],
        vec![labels.tumor.clone(), format_percent(probabilities.tumor)],
        vec![labels.normal.clone(), format_percent(probabilities.no_tumor)],
    ])
}

/// カンマ区切り・改行結合（末尾改行なし）
pub fn build_csv_text(
    outcome: Option<&AnalysisOutcome>,
    kind: AnalysisKind,
    labels: &ReportLabels,
    date: &str,
) -> Option<String> {
    let rows = build_csv_rows(outcome, kind, labels, date)?;
    Some(
        rows.iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
