//! 画像表示設定（明るさ・コントラスト・回転・拡大率・反転）
//!
//! 各セッターは新しい値を返す純粋関数。フィールドは自分の範囲にのみ
//! クランプ/折り返しされ、他のフィールドには影響しない。

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_MIN: f64 = 0.0;
pub const BRIGHTNESS_MAX: f64 = 200.0;
pub const CONTRAST_MIN: f64 = 0.0;
pub const CONTRAST_MAX: f64 = 200.0;
pub const SCALE_MIN: f64 = 0.5;
pub const SCALE_MAX: f64 = 2.0;
/// ズーム1段の倍率
pub const ZOOM_STEP: f64 = 1.2;
/// 回転1段の角度
pub const ROTATION_STEP: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    brightness: f64,
    contrast: f64,
    rotation: i32,
    scale: f64,
    flip_x: bool,
    flip_y: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            rotation: 0,
            scale: 1.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl ImageSettings {
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// 保存されている回転角（負の値もありうる）
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// 描画用に [0, 360) へ正規化した回転角
    pub fn normalized_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    #[must_use]
    pub fn with_brightness(self, value: f64) -> Self {
        Self {
            brightness: clamp_or(value, BRIGHTNESS_MIN, BRIGHTNESS_MAX, self.brightness),
            ..self
        }
    }

    #[must_use]
    pub fn with_contrast(self, value: f64) -> Self {
        Self {
            contrast: clamp_or(value, CONTRAST_MIN, CONTRAST_MAX, self.contrast),
            ..self
        }
    }

    /// 左回転（-90°）。剰余は符号を保つので -90 などの中間値が残る
    #[must_use]
    pub fn rotate_left(self) -> Self {
        Self {
            rotation: (self.rotation - ROTATION_STEP) % 360,
            ..self
        }
    }

    /// 右回転（+90°）
    #[must_use]
    pub fn rotate_right(self) -> Self {
        Self {
            rotation: (self.rotation + ROTATION_STEP) % 360,
            ..self
        }
    }

    /// 拡大（×1.2、上限2で飽和）
    #[must_use]
    pub fn zoom_in(self) -> Self {
        if self.scale >= SCALE_MAX {
            return self;
        }
        Self {
            scale: (self.scale * ZOOM_STEP).min(SCALE_MAX),
            ..self
        }
    }

    /// 縮小（÷1.2、下限0.5で飽和）
    #[must_use]
    pub fn zoom_out(self) -> Self {
        if self.scale <= SCALE_MIN {
            return self;
        }
        Self {
            scale: (self.scale / ZOOM_STEP).max(SCALE_MIN),
            ..self
        }
    }

    #[must_use]
    pub fn toggle_flip_x(self) -> Self {
        Self {
            flip_x: !self.flip_x,
            ..self
        }
    }

    #[must_use]
    pub fn toggle_flip_y(self) -> Self {
        Self {
            flip_y: !self.flip_y,
            ..self
        }
    }

    /// 既定値に戻す（部分リセットはない）
    #[must_use]
    pub fn reset(self) -> Self {
        Self::default()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// NaNは無視して現在値を保持
fn clamp_or(value: f64, min: f64, max: f64, current: f64) -> f64 {
    if value.is_nan() {
        current
    } else {
        value.clamp(min, max)
    }
}
