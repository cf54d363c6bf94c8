//! PDF/CSV出力の統合テスト

use image::{DynamicImage, RgbImage, RgbaImage};
use printpdf::{Op, TextItem};
use medscan::cli::ExportFormat;
use medscan::error::{MedScanError, Result};
use medscan::export::{csv, export_results, pdf, DirectorySink, FileSink, ReportContext};
use medscan::raster::{Rasterize, ResultPanel};
use medscan_common::export::{CSV_FILE_NAME, PDF_FILE_NAME};
use medscan_common::{
    map_regions, AnalysisKind, AnalysisOutcome, AnalysisResult, ImageHandle, Overlay, Probabilities,
    Region, ReportLabels,
};
use std::path::PathBuf;
use tempfile::tempdir;

fn detected_result() -> AnalysisResult {
    AnalysisResult {
        tumor_detected: true,
        confidence: 0.87,
        all_probabilities: Probabilities { tumor: 0.87, no_tumor: 0.13 },
        tumor_regions: vec![Region::new(0.1, 0.1, 0.3, 0.3)],
    }
}

fn test_context() -> ReportContext {
    let mut ctx = ReportContext::new(AnalysisKind::BrainTumor);
    ctx.date = "19.10.2026".to_string();
    ctx
}

/// 保存内容を記録するだけのシンク
#[derive(Default)]
struct RecordingSink {
    saved: Vec<(String, Vec<u8>)>,
}

impl FileSink for RecordingSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// 空の画像を返すパネル
struct EmptyPanel;

impl Rasterize for EmptyPanel {
    fn rasterize(&self, _supersample: f32) -> Result<RgbaImage> {
        Ok(RgbaImage::new(0, 0))
    }
}

#[test]
fn test_pdf_generation_with_panel() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(80, 60, image::Rgb([40, 40, 40])));
    let result = detected_result();
    let handle = ImageHandle::pending("scan.png").with_dimensions(80, 60);
    let overlay = map_regions(&handle, 600.0, &result.tumor_regions);
    let ctx = test_context();
    let panel = ResultPanel {
        image: Some(&source),
        overlay: &overlay,
        result: &result,
        labels: &ctx.labels,
        container_width: 600.0,
    };

    let mut sink = DirectorySink::new(dir.path());
    let path = pdf::export_pdf(Some(&panel), &ctx.labels, &ctx.date, ctx.pdf, &mut sink)
        .expect("PDF生成に失敗");

    assert_eq!(path, dir.path().join(PDF_FILE_NAME));
    let bytes = std::fs::read(&path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
    println!("PDF size: {} bytes", bytes.len());
}

/// 文書内の組み込みフォント文字列を全て集める
fn document_texts(doc: &printpdf::PdfDocument) -> Vec<String> {
    doc.pages
        .iter()
        .flat_map(|page| page.ops.iter())
        .filter_map(|op| match op {
            Op::WriteTextBuiltinFont { items, .. } => Some(items),
            _ => None,
        })
        .flat_map(|items| items.iter())
        .filter_map(|item| match item {
            TextItem::Text(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_pdf_is_byte_identical_for_same_input() {
    let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(80, 60, image::Rgb([40, 40, 40])));
    let result = detected_result();
    let handle = ImageHandle::pending("scan.png").with_dimensions(80, 60);
    let overlay = map_regions(&handle, 600.0, &result.tumor_regions);
    let ctx = test_context();
    let panel = ResultPanel {
        image: Some(&source),
        overlay: &overlay,
        result: &result,
        labels: &ctx.labels,
        container_width: 600.0,
    };

    let first = pdf::build_pdf(Some(&panel), &ctx.labels, &ctx.date, ctx.pdf).expect("PDF生成に失敗");
    let second = pdf::build_pdf(Some(&panel), &ctx.labels, &ctx.date, ctx.pdf).expect("PDF生成に失敗");

    assert!(first == second, "同じ入力でPDFのバイト列が変わった");

    let other_day = pdf::build_pdf(Some(&panel), &ctx.labels, "20.10.2026", ctx.pdf).expect("PDF生成に失敗");
    assert!(first != other_day);
}

#[test]
fn test_pdf_contains_verdict_and_numbers() {
    let result = detected_result();
    let overlay = Overlay::default();
    let ctx = test_context();
    let panel = ResultPanel {
        image: None,
        overlay: &overlay,
        result: &result,
        labels: &ctx.labels,
        container_width: 600.0,
    };

    let doc = pdf::build_document(Some(&panel), &ctx.labels, &ctx.date, ctx.pdf).expect("PDF生成に失敗");
    let texts = document_texts(&doc);

    assert!(texts.iter().any(|t| t == "Tarih: 19.10.2026"), "{:?}", texts);
    assert!(texts.iter().any(|t| t == "Tümör Tespit Edildi"), "{:?}", texts);
    assert!(texts.iter().any(|t| t.ends_with(": 87.00%") && t.starts_with("Güven")), "{:?}", texts);
    assert!(texts.iter().any(|t| t == "Tümör: 87.00%"), "{:?}", texts);
    assert!(texts.iter().any(|t| t == "Normal: 13.00%"), "{:?}", texts);
    assert!(texts.iter().any(|t| t.contains("sağlık") || t.contains("saglik")), "{:?}", texts);
}

#[test]
fn test_pdf_without_panel_writes_nothing() {
    let mut sink = RecordingSink::default();
    let labels = ReportLabels::default();

    let result = pdf::export_pdf(None, &labels, "19.10.2026", Default::default(), &mut sink);
    assert!(matches!(result, Err(MedScanError::Rasterize(_))));
    assert!(sink.saved.is_empty());
}

#[test]
fn test_pdf_zero_size_snapshot_is_error() {
    let mut sink = RecordingSink::default();
    let labels = ReportLabels::default();

    let result = pdf::export_pdf(Some(&EmptyPanel), &labels, "19.10.2026", Default::default(), &mut sink);
    assert!(result.is_err());
    assert!(sink.saved.is_empty());
}

#[test]
fn test_csv_content() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut sink = DirectorySink::new(dir.path());
    let ctx = test_context();
    let outcome = AnalysisOutcome::Success(detected_result());

    let path = csv::export_csv(Some(&outcome), ctx.kind, &ctx.labels, &ctx.date, &mut sink)
        .expect("CSV生成に失敗")
        .expect("CSVが出力されていない");

    assert_eq!(path, dir.path().join(CSV_FILE_NAME));
    let content = std::fs::read_to_string(&path).expect("CSV読み込み失敗");
    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "Tıbbi Görüntü Analizi Sonuçları");
    assert_eq!(lines[1], "Tarih,19.10.2026");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "Analiz Tipi,Beyin Tümörü Tespiti");
    assert_eq!(lines[4], "Sonuç,Tümör Tespit Edildi");
    assert_eq!(lines[5], "Güven Oranı,87.00%");
    assert_eq!(lines[8], "Tümör,87.00%");
    assert_eq!(lines[9], "Normal,13.00%");
    assert!(!content.ends_with('\n'));
}

#[test]
fn test_csv_skipped_without_result() {
    let ctx = test_context();
    let failed = AnalysisOutcome::failed("Sunucu hatası");

    let mut sink = RecordingSink::default();
    let none = csv::export_csv(None, ctx.kind, &ctx.labels, &ctx.date, &mut sink).unwrap();
    let failed = csv::export_csv(Some(&failed), ctx.kind, &ctx.labels, &ctx.date, &mut sink).unwrap();

    assert!(none.is_none());
    assert!(failed.is_none());
    assert!(sink.saved.is_empty());
}

#[test]
fn test_csv_is_stable_across_exports() {
    let ctx = test_context();
    let outcome = AnalysisOutcome::Success(detected_result());
    let mut sink = RecordingSink::default();

    csv::export_csv(Some(&outcome), ctx.kind, &ctx.labels, &ctx.date, &mut sink).unwrap();
    csv::export_csv(Some(&outcome), ctx.kind, &ctx.labels, &ctx.date, &mut sink).unwrap();

    assert_eq!(sink.saved.len(), 2);
    assert_eq!(sink.saved[0], sink.saved[1]);
}

#[test]
fn test_export_both_formats() {
    let result = AnalysisResult {
        tumor_detected: false,
        confidence: 0.92,
        all_probabilities: Probabilities { tumor: 0.08, no_tumor: 0.92 },
        tumor_regions: vec![],
    };
    let overlay = Overlay::default();
    let labels = ReportLabels::default();
    let panel = ResultPanel {
        image: None,
        overlay: &overlay,
        result: &result,
        labels: &labels,
        container_width: 600.0,
    };
    let outcome = AnalysisOutcome::Success(result.clone());
    let mut sink = RecordingSink::default();

    let summary = export_results(
        Some(&outcome),
        Some(&panel),
        &ExportFormat::Both,
        &test_context(),
        &mut sink,
    )
    .expect("出力に失敗");

    assert!(summary.pdf.is_some());
    assert!(summary.csv.is_some());
    assert!(summary.pdf_error.is_none());
    let names: Vec<&str> = sink.saved.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec![PDF_FILE_NAME, CSV_FILE_NAME]);
}

#[test]
fn test_export_pdf_failure_is_not_fatal() {
    let outcome = AnalysisOutcome::Success(detected_result());
    let mut sink = RecordingSink::default();

    let summary = export_results(
        Some(&outcome),
        Some(&EmptyPanel),
        &ExportFormat::Both,
        &test_context(),
        &mut sink,
    )
    .expect("PDF失敗で全体がエラーになった");

    assert!(summary.pdf.is_none());
    assert!(summary.pdf_error.is_some());
    assert!(summary.csv.is_some());
    assert_eq!(sink.saved.len(), 1);
}
