//! 比率矩形 → 表示座標の矩形
//!
//! 画像の実寸が分かるまでは幅0・高さ0の退化レイアウトを返す。
//! 毎回元の比率から計算し直すので、同じ入力なら常に同じ出力になる。

use crate::types::Region;
use serde::Serialize;

/// 表示コンテナ幅（既定）
pub const CONTAINER_WIDTH: f64 = 600.0;

/// 読み込み対象の画像
///
/// `width`/`height` は非同期デコードが終わるまで 0。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageHandle {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    /// 寸法未確定のハンドル
    pub fn pending(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width: 0,
            height: 0,
        }
    }

    #[must_use]
    pub fn with_dimensions(self, width: u32, height: u32) -> Self {
        Self { width, height, ..self }
    }

    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DisplayGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub scale_factor: f64,
}

impl DisplayGeometry {
    /// 幅をコンテナに合わせ、縦横比を保って高さを決める
    pub fn compute(image: &ImageHandle, container_width: f64) -> Self {
        if !image.has_dimensions() || !(container_width > 0.0) {
            return Self::default();
        }
        let scale_factor = container_width / image.width as f64;
        Self {
            display_width: image.width as f64 * scale_factor,
            display_height: image.height as f64 * scale_factor,
            scale_factor,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.display_width == 0.0 || self.display_height == 0.0
    }
}

/// 表示座標の矩形
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    /// 範囲外の比率もそのまま伸ばす（クリップしない）
    pub fn from_region(region: &Region, geometry: &DisplayGeometry) -> Self {
        Self {
            x: region.x * geometry.display_width,
            y: region.y * geometry.display_height,
            width: region.width * geometry.display_width,
            height: region.height * geometry.display_height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlay {
    pub geometry: DisplayGeometry,
    /// 入力順（後のものほど上に描く）
    pub rects: Vec<OverlayRect>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// 画像と比率矩形から表示用オーバーレイを作る
pub fn map_regions(image: &ImageHandle, container_width: f64, regions: &[Region]) -> Overlay {
    let geometry = DisplayGeometry::compute(image, container_width);
    if geometry.is_degenerate() {
        return Overlay::default();
    }

    let rects = regions
        .iter()
        .map(|region| OverlayRect::from_region(region, &geometry))
        .collect();

    Overlay { geometry, rects }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(width: u32, height: u32) -> ImageHandle {
        ImageHandle::pending("scan.png").with_dimensions(width, height)
    }

    #[test]
    fn test_geometry_800x600() {
        let geometry = DisplayGeometry::compute(&loaded(800, 600), CONTAINER_WIDTH);
        assert_eq!(geometry.display_width, 600.0);
        assert_eq!(geometry.display_height, 450.0);
        assert_eq!(geometry.scale_factor, 0.75);
    }

    #[test]
    fn test_map_regions_preserves_order() {
        let regions = [
            Region::new(0.0, 0.0, 0.5, 0.5),
            Region::new(0.5, 0.5, 0.5, 0.5),
        ];
        let overlay = map_regions(&loaded(800, 600), CONTAINER_WIDTH, &regions);

        assert_eq!(overlay.geometry.display_height, 450.0);
        assert_eq!(
            overlay.rects,
            vec![
                OverlayRect { x: 0.0, y: 0.0, width: 300.0, height: 225.0 },
                OverlayRect { x: 300.0, y: 225.0, width: 300.0, height: 225.0 },
            ]
        );
    }

    #[test]
    fn test_unknown_dimensions_degenerate() {
        let regions = [Region::new(0.1, 0.1, 0.2, 0.2)];
        let overlay = map_regions(&ImageHandle::pending("scan.png"), CONTAINER_WIDTH, &regions);

        assert!(overlay.is_empty());
        assert_eq!(overlay.geometry, DisplayGeometry::default());
        assert!(overlay.geometry.is_degenerate());
    }

    #[test]
    fn test_half_known_dimensions_degenerate() {
        let overlay = map_regions(&loaded(800, 0), CONTAINER_WIDTH, &[Region::new(0.0, 0.0, 1.0, 1.0)]);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_out_of_range_region_passes_through() {
        let regions = [Region::new(0.8, 0.9, 0.5, 0.3)];
        let overlay = map_regions(&loaded(600, 600), CONTAINER_WIDTH, &regions);

        let rect = overlay.rects[0];
        assert_eq!(rect.x, 480.0);
        assert_eq!(rect.width, 300.0);
        assert!(rect.right() > overlay.geometry.display_width);
        assert!(rect.bottom() > overlay.geometry.display_height);
    }

    #[test]
    fn test_recompute_is_bit_identical() {
        let regions = [
            Region::new(0.123, 0.456, 0.111, 0.333),
            Region::new(1.0 / 3.0, 2.0 / 7.0, 0.1, 0.9),
        ];
        let image = loaded(1023, 777);
        let first = map_regions(&image, CONTAINER_WIDTH, &regions);
        for _ in 0..10 {
            assert_eq!(map_regions(&image, CONTAINER_WIDTH, &regions), first);
        }
    }

    #[test]
    fn test_small_image_upscaled_to_container() {
        let geometry = DisplayGeometry::compute(&loaded(300, 200), CONTAINER_WIDTH);
        assert_eq!(geometry.scale_factor, 2.0);
        assert_eq!(geometry.display_height, 400.0);
    }
}
