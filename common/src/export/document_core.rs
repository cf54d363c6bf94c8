//! PDF export core: page placement of the header and the panel snapshot.

use crate::error::{Error, Result};
use crate::layout::{
    mm_to_pt, A4_HEIGHT_MM, A4_WIDTH_MM, DATE_FONT_PT, DATE_X_MM, DATE_Y_MM, HEADER_HEIGHT_MM,
    TITLE_FONT_PT, TITLE_Y_MM,
};

/// 出力ファイル名（固定）
pub const PDF_FILE_NAME: &str = "tibbi-goruntu-analizi-raporu.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// テキスト配置（mm、ページ上端基準）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x_mm: f64,
    pub baseline_y_mm: f64,
    pub font_size_pt: f32,
    pub align: TextAlign,
}

/// PDF描画で使用するレイアウト計算結果（mm、上端基準）
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// px → mm の一様縮尺
    pub ratio: f64,
    pub image_x_mm: f64,
    pub image_y_mm: f64,
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    pub title: TextPlacement,
    pub date: TextPlacement,
}

impl DocumentLayout {
    /// A4縦にスナップショット（px）を配置
    pub fn a4(image_width_px: u32, image_height_px: u32) -> Result<Self> {
        Self::fit(A4_WIDTH_MM, A4_HEIGHT_MM, image_width_px, image_height_px)
    }

    /// 縦横どちらもページに収まる一様縮尺で配置し、左右中央寄せ。
    /// 縮尺はページ全体で決まり、ヘッダー分は差し引かない。
    pub fn fit(
        page_width_mm: f64,
        page_height_mm: f64,
        image_width_px: u32,
        image_height_px: u32,
    ) -> Result<Self> {
        if image_width_px == 0 || image_height_px == 0 {
            return Err(Error::Rasterize(format!(
                "スナップショットのサイズが不正です: {}x{}",
                image_width_px, image_height_px
            )));
        }
        if !(page_width_mm > 0.0 && page_height_mm > 0.0) {
            return Err(Error::Layout(format!(
                "ページサイズが不正です: {}x{}mm",
                page_width_mm, page_height_mm
            )));
        }

        let w = image_width_px as f64;
        let h = image_height_px as f64;
        let ratio = (page_width_mm / w).min(page_height_mm / h);
        let image_width_mm = w * ratio;
        let image_height_mm = h * ratio;

        Ok(Self {
            page_width_mm,
            page_height_mm,
            ratio,
            image_x_mm: (page_width_mm - image_width_mm) / 2.0,
            image_y_mm: HEADER_HEIGHT_MM,
            image_width_mm,
            image_height_mm,
            title: TextPlacement {
                x_mm: page_width_mm / 2.0,
                baseline_y_mm: TITLE_Y_MM,
                font_size_pt: TITLE_FONT_PT,
                align: TextAlign::Center,
            },
            date: TextPlacement {
                x_mm: DATE_X_MM,
                baseline_y_mm: DATE_Y_MM,
                font_size_pt: DATE_FONT_PT,
                align: TextAlign::Left,
            },
        })
    }

    /// 上端基準のY座標をPDF（下端基準）へ変換
    pub fn pdf_y_mm(&self, top_y_mm: f64) -> f64 {
        self.page_height_mm - top_y_mm
    }

    /// 画像下端のPDF座標（XObjectの原点）
    pub fn image_bottom_pdf_y_mm(&self) -> f64 {
        self.pdf_y_mm(self.image_y_mm + self.image_height_mm)
    }

    /// スナップショット上の位置（px）に重ねるテキストの配置。
    /// 文字サイズも画像と同じ縮尺で縮める
    pub fn place_on_image(
        &self,
        x_px: f64,
        baseline_px: f64,
        font_size_px: f64,
        align: TextAlign,
    ) -> TextPlacement {
        TextPlacement {
            x_mm: self.image_x_mm + x_px * self.ratio,
            baseline_y_mm: self.image_y_mm + baseline_px * self.ratio,
            font_size_pt: mm_to_pt(font_size_px * self.ratio) as f32,
            align,
        }
    }
}
