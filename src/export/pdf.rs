//! PDFレポート生成
//!
//! 結果パネルを2倍で描画 → JPEG化 → A4にタイトル・日付と一緒に配置し、
//! パネルの文字（判定、信頼度、確率、注意書き）を同じ縮尺で重ねる。
//! スナップショットが取れなければファイルは書かない。
//! 同じ入力からは同じバイト列になる（画像ID・日付・文書IDを固定）。

use super::FileSink;
use crate::error::{MedScanError, Result};
use crate::raster::{Caption, Rasterize};
use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use medscan_common::export::{DocumentLayout, TextAlign, TextPlacement, PDF_FILE_NAME};
use medscan_common::layout::{mm_to_pt, pt_to_mm, SUPERSAMPLE};
use medscan_common::ReportLabels;
use printpdf::{
    BuiltinFont, Color, Mm, OffsetDateTime, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt,
    RawImage, Rgb, TextItem, XObject, XObjectId, XObjectTransform,
};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::debug;

const FONT: BuiltinFont = BuiltinFont::Helvetica;

/// ページ内で唯一の画像リソース名
const SNAPSHOT_XOBJECT: &str = "Im1";

/// PDF出力設定
#[derive(Debug, Clone, Copy)]
pub struct PdfOptions {
    pub supersample: f32,
    /// JPEG品質 (1-100)
    pub jpeg_quality: u8,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            supersample: SUPERSAMPLE,
            jpeg_quality: 100,
        }
    }
}

/// 保存前のPDF文書を組み立てる
pub fn build_document(
    panel: Option<&dyn Rasterize>,
    labels: &ReportLabels,
    date: &str,
    options: PdfOptions,
) -> Result<PdfDocument> {
    let panel = panel.ok_or_else(|| MedScanError::Rasterize("結果パネルがありません".into()))?;
    let snapshot = panel.rasterize(options.supersample)?;
    let layout = DocumentLayout::a4(snapshot.width(), snapshot.height())?;
    debug!(
        width = snapshot.width(),
        height = snapshot.height(),
        ratio = layout.ratio,
        "スナップショット配置"
    );

    let jpeg = encode_jpeg(snapshot, options.jpeg_quality)?;
    let mut warnings = Vec::new();
    let image = RawImage::decode_from_bytes(&jpeg, &mut warnings)
        .map_err(|e| MedScanError::PdfGeneration(format!("画像読み込みエラー: {}", e)))?;
    let (image_width, image_height) = (image.width as f64, image.height as f64);

    let mut doc = PdfDocument::new(&fold_to_ascii(&labels.document_title));
    pin_metadata(&mut doc, date);
    let image_id = XObjectId(SNAPSHOT_XOBJECT.to_string());
    doc.resources
        .xobjects
        .map
        .insert(image_id.clone(), XObject::Image(image));

    let mut ops = Vec::new();

    // 画像は左下原点。dpi 72 で 1px = 1pt として倍率を決める
    ops.push(Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Mm(layout.image_x_mm as f32).into()),
            translate_y: Some(Mm(layout.image_bottom_pdf_y_mm() as f32).into()),
            scale_x: Some((mm_to_pt(layout.image_width_mm) / image_width) as f32),
            scale_y: Some((mm_to_pt(layout.image_height_mm) / image_height) as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    });

    push_text(&mut ops, &layout, &layout.title, &labels.document_title, None);
    push_text(&mut ops, &layout, &layout.date, &labels.date_line(date), None);

    let s = options.supersample as f64;
    for caption in panel.captions() {
        let placement = caption_placement(&layout, &caption, s);
        push_text(&mut ops, &layout, &placement, &caption.text, Some(caption.rgb));
    }

    let page = PdfPage::new(
        Mm(layout.page_width_mm as f32),
        Mm(layout.page_height_mm as f32),
        ops,
    );
    doc.with_pages(vec![page]);
    Ok(doc)
}

/// PDFのバイト列を生成
pub fn build_pdf(
    panel: Option<&dyn Rasterize>,
    labels: &ReportLabels,
    date: &str,
    options: PdfOptions,
) -> Result<Vec<u8>> {
    let doc = build_document(panel, labels, date, options)?;
    let mut warnings = Vec::new();
    let mut bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    if bytes.is_empty() {
        return Err(MedScanError::PdfGeneration("PDFが空です".into()));
    }
    pin_trailer_id(&mut bytes);
    Ok(bytes)
}

/// PDFを生成して保存
pub fn export_pdf(
    panel: Option<&dyn Rasterize>,
    labels: &ReportLabels,
    date: &str,
    options: PdfOptions,
    sink: &mut dyn FileSink,
) -> Result<PathBuf> {
    let bytes = build_pdf(panel, labels, date, options)?;
    sink.save(PDF_FILE_NAME, &bytes)
}

/// 作成日時はレポート日付の0時、識別子は日付から決める
fn pin_metadata(doc: &mut PdfDocument, date: &str) {
    let timestamp = NaiveDate::parse_from_str(date, "%d.%m.%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0);

    let info = &mut doc.metadata.info;
    if let Ok(stamp) = OffsetDateTime::from_unix_timestamp(timestamp) {
        info.creation_date = stamp;
        info.modification_date = stamp;
        info.metadata_date = stamp;
    }
    info.identifier = format!("medscan-{}", date);
}

/// トレーラーの /ID は保存のたびに乱数で埋まるので、それより前の内容の
/// ハッシュで同じ長さのまま上書きする
fn pin_trailer_id(bytes: &mut [u8]) {
    let Some(start) = bytes.windows(3).rposition(|w| w == b"/ID") else {
        return;
    };
    let digest = hex::encode(Sha256::digest(&bytes[..start]));

    let mut cursor = start;
    for chunk in digest.as_bytes().chunks(32) {
        let Some(open) = bytes[cursor..].iter().position(|&b| b == b'(').map(|p| cursor + p) else {
            return;
        };
        let Some(close) = bytes[open + 1..].iter().position(|&b| b == b')').map(|p| open + 1 + p)
        else {
            return;
        };
        let slot = &mut bytes[open + 1..close];
        if slot.len() == chunk.len() {
            slot.copy_from_slice(chunk);
        }
        cursor = close + 1;
    }
}

fn encode_jpeg(snapshot: RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(snapshot).to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(jpeg)
}

/// パネル座標（等倍px）→ スナップショット座標（倍率px）→ ページ
fn caption_placement(layout: &DocumentLayout, caption: &Caption, supersample: f64) -> TextPlacement {
    layout.place_on_image(
        caption.x as f64 * supersample,
        caption.baseline as f64 * supersample,
        caption.font_size as f64 * supersample,
        caption.align,
    )
}

fn push_text(
    ops: &mut Vec<Op>,
    layout: &DocumentLayout,
    placement: &TextPlacement,
    text: &str,
    rgb: Option<[u8; 3]>,
) {
    let text = fold_to_ascii(text);
    let width_mm = pt_to_mm(estimate_text_width_pt(&text, placement.font_size_pt));
    let x_mm = match placement.align {
        TextAlign::Left => placement.x_mm,
        TextAlign::Center => placement.x_mm - width_mm / 2.0,
        TextAlign::Right => placement.x_mm - width_mm,
    };
    let y_mm = layout.pdf_y_mm(placement.baseline_y_mm);
    let [r, g, b] = rgb.unwrap_or([0, 0, 0]);

    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            icc_profile: None,
        }),
    });
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Mm(x_mm as f32).into(),
            y: Mm(y_mm as f32).into(),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(placement.font_size_pt),
        font: FONT,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text)],
        font: FONT,
    });
    ops.push(Op::EndTextSection);
}

/// 組み込みフォントはWinAnsiのみ。トルコ語のうちWinAnsiにない ı ş ğ を寄せる
pub fn fold_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ı' => 'i',
            'İ' => 'I',
            'ş' => 's',
            'Ş' => 'S',
            'ğ' => 'g',
            'Ğ' => 'G',
            c if c.is_ascii() || ('\u{a0}'..='\u{ff}').contains(&c) => c,
            _ => '?',
        })
        .collect()
}

/// Helveticaの概算幅（em比）から文字列幅を見積もる
fn estimate_text_width_pt(text: &str, font_size_pt: f32) -> f64 {
    let em: f64 = text
        .chars()
        .map(|c| match c {
            ' ' | '.' | ',' | ':' | ';' | 'i' | 'j' | 'l' | 'I' | '!' | '\'' => 0.278,
            'f' | 't' | 'r' => 0.333,
            'm' | 'M' | 'W' | '%' => 0.833,
            'w' => 0.722,
            c if c.is_ascii_digit() => 0.556,
            c if c.is_uppercase() => 0.667,
            _ => 0.556,
        })
        .sum();
    em * font_size_pt as f64
}
