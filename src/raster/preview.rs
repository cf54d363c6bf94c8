//! 表示エフェクトを画素へ適用したプレビュー
//!
//! ## 適用順
//! 1. brightness → contrast（フィルタ文字列の左から順）
//! 2. scaleY → scaleX → scale → rotate（変換列の右から順に点へ作用）

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use medscan_common::VisualEffect;
use tracing::warn;

pub fn apply_effect(source: &DynamicImage, effect: &VisualEffect) -> RgbaImage {
    let mut img = source.to_rgba8();

    apply_filter(&mut img, effect.brightness as f32, effect.contrast as f32);

    if effect.flip_y {
        imageops::flip_vertical_in_place(&mut img);
    }
    if effect.flip_x {
        imageops::flip_horizontal_in_place(&mut img);
    }

    if effect.scale != 1.0 {
        let w = ((img.width() as f64) * effect.scale).round().max(1.0) as u32;
        let h = ((img.height() as f64) * effect.scale).round().max(1.0) as u32;
        img = imageops::resize(&img, w, h, FilterType::Triangle);
    }

    match effect.rotation {
        0 => img,
        90 => imageops::rotate90(&img),
        180 => imageops::rotate180(&img),
        270 => imageops::rotate270(&img),
        other => {
            warn!(rotation = other, "直角以外の回転はプレビューに反映しません");
            img
        }
    }
}

/// brightness(b) contrast(c)（CSSフィルタと同じ式）
fn apply_filter(img: &mut RgbaImage, brightness: f32, contrast: f32) {
    if brightness == 1.0 && contrast == 1.0 {
        return;
    }

    for pixel in img.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let mut v = *channel as f32 / 255.0;
            v *= brightness;
            v = (v - 0.5) * contrast + 0.5;
            *channel = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}
