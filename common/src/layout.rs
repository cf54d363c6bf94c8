//! レイアウト設定モジュール
//!
//! PDFレポートのmm基準レイアウト（Source of Truth）と
//! 結果パネルの描画定数

// ============================================
// mm基準レイアウト
// ============================================

/// A4サイズ（mm、縦）
pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

/// タイトル（中央寄せ、上端からのベースライン位置）
pub const TITLE_Y_MM: f64 = 20.0;
pub const TITLE_FONT_PT: f32 = 16.0;

/// 日付行
pub const DATE_X_MM: f64 = 20.0;
pub const DATE_Y_MM: f64 = 27.0;
pub const DATE_FONT_PT: f32 = 10.0;

/// ヘッダー領域の高さ = 画像の上端（mm）
pub const HEADER_HEIGHT_MM: f64 = 30.0;

// ============================================
// 結果パネル
// ============================================

/// スナップショットの超解像倍率
pub const SUPERSAMPLE: f32 = 2.0;

/// パネル余白（px、等倍時）
pub const PANEL_PADDING_PX: f32 = 16.0;

/// 確率バーの高さ（px、等倍時）
pub const PROBABILITY_BAR_HEIGHT_PX: f32 = 24.0;

/// 判定見出し（px、等倍時）
pub const HEADING_FONT_PX: f32 = 20.0;
pub const HEADING_LINE_PX: f32 = 28.0;

/// 本文行（信頼度、確率ラベル、注意書き）
pub const BODY_FONT_PX: f32 = 14.0;
pub const BODY_LINE_PX: f32 = 20.0;

/// 注意書きボックス
pub const ADVICE_BOX_HEIGHT_PX: f32 = 36.0;
pub const ADVICE_TEXT_INSET_PX: f32 = 12.0;

/// スナップショットの最大画素数（超えたら描画せずエラー）
pub const MAX_PANEL_PIXELS: u64 = 64_000_000;

/// 腫瘍枠の線幅と破線パターン（px、等倍時）
pub const REGION_STROKE_WIDTH_PX: f32 = 2.0;
pub const REGION_DASH_PX: [f32; 2] = [5.0, 5.0];

/// 配色（RGBA）
pub const TUMOR_RGBA: [u8; 4] = [0xff, 0x44, 0x44, 0xff];
/// rgba(255, 68, 68, 0.2)
pub const TUMOR_FILL_RGBA: [u8; 4] = [0xff, 0x44, 0x44, 51];
pub const NORMAL_RGBA: [u8; 4] = [0x4c, 0xaf, 0x50, 0xff];
pub const PANEL_BACKGROUND_RGBA: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
pub const TEXT_RGBA: [u8; 4] = [0x33, 0x33, 0x33, 0xff];
/// 注意書きの背景（腫瘍あり: warning / なし: success）
pub const ADVICE_WARNING_RGBA: [u8; 4] = [0xff, 0xf4, 0xe5, 0xff];
pub const ADVICE_SUCCESS_RGBA: [u8; 4] = [0xed, 0xf7, 0xed, 0xff];

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / MM_TO_PT
}
