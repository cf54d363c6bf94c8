//! 結果パネルのスナップショット
//!
//! 画面上の結果表示（判定見出し、信頼度、画像＋腫瘍枠、確率バー、注意書き）を
//! 超解像倍率で描画する。枠線やバーは tiny-skia、画像の縮小は `image` で行う。
//! 文字は画素に描かず `captions()` で位置つきの文字列として渡す。

use super::{Caption, Rasterize};
use crate::error::{MedScanError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use medscan_common::export::TextAlign;
use medscan_common::layout::{
    ADVICE_BOX_HEIGHT_PX, ADVICE_SUCCESS_RGBA, ADVICE_TEXT_INSET_PX, ADVICE_WARNING_RGBA,
    BODY_FONT_PX, BODY_LINE_PX, HEADING_FONT_PX, HEADING_LINE_PX, MAX_PANEL_PIXELS, NORMAL_RGBA,
    PANEL_BACKGROUND_RGBA, PANEL_PADDING_PX, PROBABILITY_BAR_HEIGHT_PX, REGION_DASH_PX,
    REGION_STROKE_WIDTH_PX, TEXT_RGBA, TUMOR_FILL_RGBA, TUMOR_RGBA,
};
use medscan_common::{AnalysisResult, Overlay, ReportLabels};
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

/// 結果パネル（成功時のみ作られる）
pub struct ResultPanel<'a> {
    pub image: Option<&'a DynamicImage>,
    pub overlay: &'a Overlay,
    pub result: &'a AnalysisResult,
    pub labels: &'a ReportLabels,
    pub container_width: f64,
}

/// 論理px単位のパネル配置（上から順）
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanelLayout {
    width: f32,
    height: f32,
    heading_top: f32,
    confidence_top: f32,
    image_top: Option<f32>,
    bar_top: f32,
    legend_top: f32,
    advice_top: f32,
}

impl<'a> ResultPanel<'a> {
    /// 腫瘍ありで枠があり、画像寸法が確定しているときだけ画像を載せる
    fn shows_image(&self) -> bool {
        self.image.is_some() && self.result.has_regions() && !self.overlay.geometry.is_degenerate()
    }

    fn layout(&self) -> PanelLayout {
        let pad = PANEL_PADDING_PX;
        let mut y = pad;

        let heading_top = y;
        y += HEADING_LINE_PX;
        let confidence_top = y;
        y += BODY_LINE_PX + pad;

        let image_top = if self.shows_image() {
            let top = y;
            y += self.overlay.geometry.display_height as f32 + pad;
            Some(top)
        } else {
            None
        };

        let bar_top = y;
        y += PROBABILITY_BAR_HEIGHT_PX;
        let legend_top = y;
        y += BODY_LINE_PX + pad;
        let advice_top = y;
        y += ADVICE_BOX_HEIGHT_PX + pad;

        PanelLayout {
            width: self.container_width as f32 + pad * 2.0,
            height: y,
            heading_top,
            confidence_top,
            image_top,
            bar_top,
            legend_top,
            advice_top,
        }
    }

    fn verdict_rgba(&self) -> [u8; 4] {
        if self.result.tumor_detected {
            TUMOR_RGBA
        } else {
            NORMAL_RGBA
        }
    }
}

impl Rasterize for ResultPanel<'_> {
    fn rasterize(&self, supersample: f32) -> Result<RgbaImage> {
        if !(supersample.is_finite() && supersample > 0.0) {
            return Err(MedScanError::Rasterize(format!("倍率が不正です: {}", supersample)));
        }
        if !(self.container_width.is_finite() && self.container_width > 0.0) {
            return Err(MedScanError::Rasterize("パネル幅が0です".into()));
        }

        let layout = self.layout();
        let s = supersample;
        let (width_f, height_f) = ((layout.width * s).round() as f64, (layout.height * s).round() as f64);
        if !(width_f * height_f <= MAX_PANEL_PIXELS as f64) {
            return Err(MedScanError::Rasterize(format!(
                "パネルが大きすぎます: {}x{}",
                width_f, height_f
            )));
        }
        let (width, height) = (width_f as u32, height_f as u32);
        if width == 0 || height == 0 {
            return Err(MedScanError::Rasterize(format!("パネルサイズが0です: {}x{}", width, height)));
        }

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(PANEL_BACKGROUND_RGBA));
        let pad = PANEL_PADDING_PX * s;

        let image_area = match (layout.image_top, self.image) {
            (Some(top), Some(source)) => {
                let geometry = &self.overlay.geometry;
                let w = ((geometry.display_width as f32) * s).round().max(1.0) as u32;
                let h = ((geometry.display_height as f32) * s).round().max(1.0) as u32;
                // 透過は白背景に合成済みの不透明画像として扱う
                let opaque = DynamicImage::ImageRgb8(source.to_rgb8()).to_rgba8();
                let scaled = imageops::resize(&opaque, w, h, FilterType::Triangle);
                let top_px = top * s;
                imageops::replace(&mut canvas, &scaled, pad.round() as i64, top_px.round() as i64);
                Some((pad, top_px, w as f32, h as f32))
            }
            _ => None,
        };

        let overlay = self.overlay;
        let result = self.result;
        let content_width = self.container_width as f32 * s;
        let advice_rgba = if result.tumor_detected {
            ADVICE_WARNING_RGBA
        } else {
            ADVICE_SUCCESS_RGBA
        };

        with_pixmap(&mut canvas, |pixmap| {
            if let Some(area) = image_area {
                draw_regions(pixmap, overlay, area, s);
            }
            draw_probability_bar(
                pixmap,
                result,
                pad,
                layout.bar_top * s,
                content_width,
                PROBABILITY_BAR_HEIGHT_PX * s,
            );
            if let Some(r) = tiny_skia::Rect::from_xywh(
                pad,
                layout.advice_top * s,
                content_width,
                ADVICE_BOX_HEIGHT_PX * s,
            ) {
                pixmap.fill_rect(r, &paint_rgba(advice_rgba), Transform::identity(), None);
            }
        })?;

        Ok(canvas)
    }

    fn captions(&self) -> Vec<Caption> {
        let layout = self.layout();
        let pad = PANEL_PADDING_PX;
        let cw = self.container_width as f32;
        let labels = self.labels;
        let result = self.result;
        let probabilities = &result.all_probabilities;
        let body = |top: f32| top + BODY_FONT_PX;

        vec![
            Caption {
                text: labels.verdict_text(result.tumor_detected).to_string(),
                x: pad + cw / 2.0,
                baseline: layout.heading_top + HEADING_FONT_PX,
                font_size: HEADING_FONT_PX,
                align: TextAlign::Center,
                rgb: rgb(self.verdict_rgba()),
            },
            Caption {
                text: labels.confidence_line(result.confidence),
                x: pad + cw / 2.0,
                baseline: body(layout.confidence_top),
                font_size: BODY_FONT_PX,
                align: TextAlign::Center,
                rgb: rgb(TEXT_RGBA),
            },
            Caption {
                text: labels.probability_line(&labels.tumor, probabilities.tumor),
                x: pad,
                baseline: body(layout.legend_top),
                font_size: BODY_FONT_PX,
                align: TextAlign::Left,
                rgb: rgb(TUMOR_RGBA),
            },
            Caption {
                text: labels.probability_line(&labels.normal, probabilities.no_tumor),
                x: pad + cw,
                baseline: body(layout.legend_top),
                font_size: BODY_FONT_PX,
                align: TextAlign::Right,
                rgb: rgb(NORMAL_RGBA),
            },
            Caption {
                text: labels.advice_text(result.tumor_detected).to_string(),
                x: pad + ADVICE_TEXT_INSET_PX,
                baseline: layout.advice_top + (ADVICE_BOX_HEIGHT_PX + BODY_FONT_PX * 0.7) / 2.0,
                font_size: BODY_FONT_PX,
                align: TextAlign::Left,
                rgb: rgb(TEXT_RGBA),
            },
        ]
    }
}

fn rgb(rgba: [u8; 4]) -> [u8; 3] {
    [rgba[0], rgba[1], rgba[2]]
}

/// RgbaImage を Pixmap として描画し、書き戻す（キャンバスは不透明前提）
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) -> Result<()> {
    let (w, h) = (img.width(), img.height());
    let size = tiny_skia::IntSize::from_wh(w, h)
        .ok_or_else(|| MedScanError::Rasterize(format!("パネルサイズが不正です: {}x{}", w, h)))?;
    let mut pixmap = Pixmap::from_vec(img.as_raw().clone(), size)
        .ok_or_else(|| MedScanError::Rasterize("Pixmapの生成に失敗しました".into()))?;

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
    Ok(())
}

fn paint_rgba(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

/// 枠は入力順に描く（後のものが上）。画像の外にはみ出した部分は切り取る
fn draw_regions(pixmap: &mut Pixmap, overlay: &Overlay, area: (f32, f32, f32, f32), s: f32) {
    let (left, top, width, height) = area;

    let Some(clip_rect) = tiny_skia::Rect::from_xywh(left, top, width, height) else {
        return;
    };
    let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) else {
        return;
    };
    mask.fill_path(&PathBuilder::from_rect(clip_rect), FillRule::Winding, false, Transform::identity());

    let fill = paint_rgba(TUMOR_FILL_RGBA);
    let stroke_paint = paint_rgba(TUMOR_RGBA);
    let stroke = Stroke {
        width: REGION_STROKE_WIDTH_PX * s,
        dash: StrokeDash::new(REGION_DASH_PX.iter().map(|d| d * s).collect(), 0.0),
        ..Default::default()
    };

    for rect in &overlay.rects {
        let Some(r) = tiny_skia::Rect::from_xywh(
            left + rect.x as f32 * s,
            top + rect.y as f32 * s,
            rect.width as f32 * s,
            rect.height as f32 * s,
        ) else {
            continue;
        };
        let path = PathBuilder::from_rect(r);
        pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), Some(&mask));
        pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), Some(&mask));
    }
}

/// 腫瘍（赤）と正常（緑）の確率を横並びのバーで描く
fn draw_probability_bar(
    pixmap: &mut Pixmap,
    result: &AnalysisResult,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    let tumor = result.all_probabilities.tumor.clamp(0.0, 1.0) as f32;
    let normal = result.all_probabilities.no_tumor.clamp(0.0, 1.0) as f32;

    let tumor_width = width * tumor;
    let normal_width = (width * normal).min(width - tumor_width);

    if let Some(r) = tiny_skia::Rect::from_xywh(left, top, tumor_width, height) {
        pixmap.fill_rect(r, &paint_rgba(TUMOR_RGBA), Transform::identity(), None);
    }
    if let Some(r) = tiny_skia::Rect::from_xywh(left + tumor_width, top, normal_width, height) {
        pixmap.fill_rect(r, &paint_rgba(NORMAL_RGBA), Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medscan_common::{map_regions, ImageHandle, Probabilities, Region};

    fn result_with_regions(regions: Vec<Region>) -> AnalysisResult {
        AnalysisResult {
            tumor_detected: true,
            confidence: 0.75,
            all_probabilities: Probabilities { tumor: 0.75, no_tumor: 0.25 },
            tumor_regions: regions,
        }
    }

    fn negative_result() -> AnalysisResult {
        AnalysisResult {
            tumor_detected: false,
            confidence: 0.9,
            all_probabilities: Probabilities { tumor: 0.1, no_tumor: 0.9 },
            tumor_regions: vec![],
        }
    }

    #[test]
    fn test_panel_with_image_is_supersampled() {
        let source = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(80, 60, image::Rgb([0, 0, 0])));
        let result = result_with_regions(vec![Region::new(0.0, 0.0, 0.5, 0.5)]);
        let handle = ImageHandle::pending("scan.png").with_dimensions(80, 60);
        let overlay = map_regions(&handle, 600.0, &result.tumor_regions);
        let labels = ReportLabels::default();

        let panel = ResultPanel {
            image: Some(&source),
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        let snapshot = panel.rasterize(2.0).expect("描画失敗");

        // (600 + 16*2) * 2
        assert_eq!(snapshot.width(), 1264);
        // (16 + 28 + 20 + 16 + 450 + 16 + 24 + 20 + 16 + 36 + 16) * 2
        assert_eq!(snapshot.height(), 1316);

        // 画像は上端80pxから。枠内部は黒画像に赤が半透明で乗る
        let inside = snapshot.get_pixel(32 + 100, 160 + 100);
        assert!(inside[0] > inside[1]);
    }

    #[test]
    fn test_panel_without_regions_has_no_image() {
        let result = negative_result();
        let overlay = Overlay::default();
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: None,
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        let snapshot = panel.rasterize(1.0).expect("描画失敗");
        assert_eq!(snapshot.height(), 192);

        // バー右側は正常（緑）
        let px = snapshot.get_pixel(16 + 500, 80 + 12);
        assert!(px[1] > px[0]);
    }

    #[test]
    fn test_captions_carry_verdict_and_numbers() {
        let result = result_with_regions(vec![]);
        let overlay = Overlay::default();
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: None,
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };

        let captions = panel.captions();
        let texts: Vec<&str> = captions.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Tümör Tespit Edildi",
                "Güven Oranı: 75.00%",
                "Tümör: 75.00%",
                "Normal: 25.00%",
                labels.advice_detected.as_str(),
            ]
        );
        assert_eq!(captions[0].rgb, [0xff, 0x44, 0x44]);
        assert_eq!(captions[3].align, TextAlign::Right);
        assert_eq!(captions[3].x, 616.0);

        // 文字はすべてパネル内に収まる
        let height = panel.rasterize(1.0).expect("描画失敗").height() as f32;
        assert!(captions.iter().all(|c| c.baseline > 0.0 && c.baseline < height));
    }

    #[test]
    fn test_negative_verdict_is_green() {
        let result = negative_result();
        let overlay = Overlay::default();
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: None,
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        let captions = panel.captions();
        assert_eq!(captions[0].text, "Tümör Tespit Edilmedi");
        assert_eq!(captions[0].rgb, [0x4c, 0xaf, 0x50]);
        assert_eq!(captions[4].text, labels.advice_not_detected);
    }

    #[test]
    fn test_invalid_supersample_is_error() {
        let result = result_with_regions(vec![]);
        let overlay = Overlay::default();
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: None,
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        assert!(matches!(panel.rasterize(0.0), Err(MedScanError::Rasterize(_))));
        assert!(matches!(panel.rasterize(f32::NAN), Err(MedScanError::Rasterize(_))));
    }

    #[test]
    fn test_oversized_panel_is_error() {
        // 1x100000 の画像は表示高さ 6000万px になる
        let source = DynamicImage::ImageRgb8(image::RgbImage::new(1, 1));
        let result = result_with_regions(vec![Region::new(0.0, 0.0, 1.0, 1.0)]);
        let handle = ImageHandle::pending("strip.png").with_dimensions(1, 100_000);
        let overlay = map_regions(&handle, 600.0, &result.tumor_regions);
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: Some(&source),
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        assert!(matches!(panel.rasterize(2.0), Err(MedScanError::Rasterize(_))));

        let no_image = ResultPanel { image: None, ..panel };
        assert!(matches!(no_image.rasterize(1000.0), Err(MedScanError::Rasterize(_))));
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let source = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(40, 40, image::Rgb([10, 20, 30])));
        let result = result_with_regions(vec![Region::new(0.2, 0.2, 0.9, 0.9)]);
        let handle = ImageHandle::pending("scan.png").with_dimensions(40, 40);
        let overlay = map_regions(&handle, 600.0, &result.tumor_regions);
        let labels = ReportLabels::default();
        let panel = ResultPanel {
            image: Some(&source),
            overlay: &overlay,
            result: &result,
            labels: &labels,
            container_width: 600.0,
        };
        assert_eq!(panel.rasterize(2.0).unwrap(), panel.rasterize(2.0).unwrap());
    }
}
