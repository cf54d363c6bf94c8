//! ラスタライズ（結果パネルのスナップショット、表示エフェクトのプレビュー）

mod panel;
mod preview;

pub use panel::ResultPanel;
pub use preview::apply_effect;

use crate::error::Result;
use image::RgbaImage;
use medscan_common::export::TextAlign;

/// スナップショットに重ねる文字列（座標は等倍px、スナップショット左上基準）
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub align: TextAlign,
    pub rgb: [u8; 3],
}

/// 画面上の表示面を画像として取り出す
pub trait Rasterize {
    /// `supersample` 倍の解像度で描画する
    fn rasterize(&self, supersample: f32) -> Result<RgbaImage>;

    /// 画素には描かず、出力側でテキストとして重ねる文字列
    fn captions(&self) -> Vec<Caption> {
        Vec::new()
    }
}
