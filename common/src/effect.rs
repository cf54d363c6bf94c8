//! ImageSettings → 表示エフェクト記述子
//!
//! 変換の合成順は固定: rotate → scale → scaleX → scaleY。
//! 反転は画像自身の座標系で適用されるため、順序を入れ替えると
//! 回転と反転を併用したときの見た目が変わる。

use crate::settings::ImageSettings;
use serde::Serialize;

/// 2x2線形変換（CSS matrix(a, b, c, d, 0, 0) と同じ並び）
///
/// x' = a*x + c*y, y' = b*x + d*y（y軸下向き）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Matrix2 {
    pub const IDENTITY: Matrix2 = Matrix2 { a: 1.0, b: 0.0, c: 0.0, d: 1.0 };

    pub fn rotate(degrees: i32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        Matrix2 { a: cos, b: sin, c: -sin, d: cos }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Matrix2 { a: sx, b: 0.0, c: 0.0, d: sy }
    }

    /// self を左、other を右に置いた積（other が先に点へ作用する）
    pub fn then_apply(self, other: Matrix2) -> Self {
        Matrix2 {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }
}

/// 直角の倍数は誤差なしの値を返す
fn sin_cos_degrees(degrees: i32) -> (f64, f64) {
    match degrees.rem_euclid(360) {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        d => (d as f64).to_radians().sin_cos(),
    }
}

/// 描画面に渡すエフェクト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEffect {
    /// 例: "brightness(100%) contrast(100%)"
    pub filter: String,
    /// 例: "rotate(90deg) scale(1) scaleX(-1) scaleY(1)"
    pub transform: String,
    pub matrix: Matrix2,
    /// 明るさ係数（1.0 = 100%）
    pub brightness: f64,
    /// コントラスト係数（1.0 = 100%）
    pub contrast: f64,
    /// [0, 360) に正規化済み
    pub rotation: i32,
    pub scale: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl VisualEffect {
    pub fn from_settings(settings: &ImageSettings) -> Self {
        let rotation = settings.normalized_rotation();
        let scale = settings.scale();
        let sx = axis_sign(settings.flip_x());
        let sy = axis_sign(settings.flip_y());

        let filter = format!(
            "brightness({}%) contrast({}%)",
            settings.brightness(),
            settings.contrast()
        );
        let transform = format!(
            "rotate({}deg) scale({}) scaleX({}) scaleY({})",
            rotation, scale, sx, sy
        );
        let matrix = Matrix2::rotate(rotation)
            .then_apply(Matrix2::scale(scale, scale))
            .then_apply(Matrix2::scale(sx as f64, 1.0))
            .then_apply(Matrix2::scale(1.0, sy as f64));

        Self {
            filter,
            transform,
            matrix,
            brightness: settings.brightness() / 100.0,
            contrast: settings.contrast() / 100.0,
            rotation,
            scale,
            flip_x: settings.flip_x(),
            flip_y: settings.flip_y(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.contrast == 1.0 && self.matrix == Matrix2::IDENTITY
    }
}

fn axis_sign(flipped: bool) -> i32 {
    if flipped {
        -1
    } else {
        1
    }
}

/// `VisualEffect::from_settings` の関数版
pub fn render_effect(settings: &ImageSettings) -> VisualEffect {
    VisualEffect::from_settings(settings)
}
