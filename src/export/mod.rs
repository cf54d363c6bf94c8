pub mod csv;
pub mod pdf;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::raster::Rasterize;
use medscan_common::{AnalysisKind, AnalysisOutcome, ReportLabels};
use pdf::PdfOptions;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// 生成したファイルの保存先
pub trait FileSink {
    /// 保存して書き込み先パスを返す
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// ディレクトリへ固定ファイル名で保存
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "ファイル出力");
        Ok(path)
    }
}

/// レポート日付（tr-TR 短縮形式 dd.mm.yyyy）
pub fn report_date() -> String {
    chrono::Local::now().format("%d.%m.%Y").to_string()
}

/// 出力に共通する情報
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub kind: AnalysisKind,
    pub labels: ReportLabels,
    pub date: String,
    pub pdf: PdfOptions,
}

impl ReportContext {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            labels: ReportLabels::default(),
            date: report_date(),
            pdf: PdfOptions::default(),
        }
    }
}

/// 出力結果のまとめ
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub pdf: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    /// PDF出力の失敗（致命的ではない）
    pub pdf_error: Option<String>,
}

/// 指定形式で出力する。PDFの失敗はログに残して続行、CSVは結果がなければ何もしない
pub fn export_results(
    outcome: Option<&AnalysisOutcome>,
    panel: Option<&dyn Rasterize>,
    format: &ExportFormat,
    ctx: &ReportContext,
    sink: &mut dyn FileSink,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    if matches!(format, ExportFormat::Pdf | ExportFormat::Both) {
        println!("- PDFを生成中...");
        match pdf::export_pdf(panel, &ctx.labels, &ctx.date, ctx.pdf, sink) {
            Ok(path) => {
                println!("✔ PDF出力: {}", path.display());
                summary.pdf = Some(path);
            }
            Err(e) => {
                error!("PDF生成エラー: {}", e);
                println!("✘ PDF出力に失敗: {}", e);
                summary.pdf_error = Some(e.to_string());
            }
        }
    }

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        println!("- CSVを生成中...");
        summary.csv = csv::export_csv(outcome, ctx.kind, &ctx.labels, &ctx.date, sink)?;
        match &summary.csv {
            Some(path) => println!("✔ CSV出力: {}", path.display()),
            None => println!("- 解析結果がないためCSVは出力しません"),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_date_format() {
        let date = report_date();
        let parts: Vec<&str> = date.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_directory_sink_creates_dir() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut sink = DirectorySink::new(dir.path().join("nested"));
        let path = sink.save("a.txt", b"abc").expect("保存失敗");
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        assert!(path.starts_with(sink.dir()));
    }
}
