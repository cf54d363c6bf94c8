//! 解析結果の型定義
//!
//! - Region: 元画像に対する比率で表した矩形
//! - AnalysisResponse: バックエンドのJSONそのもの（全フィールド任意）
//! - AnalysisOutcome: 成功/失敗の直和型。セッションと出力はこちらのみ扱う

use serde::{Deserialize, Serialize};

/// 腫瘍候補領域（元画像の幅・高さに対する比率 0.0-1.0）
///
/// 範囲外の値もそのまま保持する（クリップしない）。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// クラス別確率（合計1は保証しない）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Probabilities {
    pub tumor: f64,
    pub no_tumor: f64,
}

/// 解析成功時の結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tumor_detected: bool,
    pub confidence: f64,
    pub all_probabilities: Probabilities,
    /// バックエンドの返却順を保持する（描画順 = 重なり順）
    #[serde(default)]
    pub tumor_regions: Vec<Region>,
}

impl AnalysisResult {
    /// オーバーレイを描くべきか
    pub fn has_regions(&self) -> bool {
        self.tumor_detected && !self.tumor_regions.is_empty()
    }
}

/// バックエンドのレスポンス（受信用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    pub tumor_detected: Option<bool>,
    pub confidence: Option<f64>,
    pub all_probabilities: Option<Probabilities>,
    pub tumor_regions: Vec<Region>,
    pub error: Option<String>,
}

/// 解析の結果（成功 or 失敗）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "AnalysisResponse")]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    Failed { error: String },
}

impl AnalysisOutcome {
    /// 通信失敗時にユーザーへ表示するメッセージ
    pub const REQUEST_FAILED: &'static str = "Görüntü analizi sırasında bir hata oluştu.";

    pub fn failed(error: impl Into<String>) -> Self {
        AnalysisOutcome::Failed { error: error.into() }
    }

    /// `error` があれば他のフィールドは無視する
    pub fn from_response(response: AnalysisResponse) -> Result<Self, String> {
        if let Some(error) = response.error {
            return Ok(AnalysisOutcome::Failed { error });
        }

        let tumor_detected = response
            .tumor_detected
            .ok_or_else(|| "tumor_detected がありません".to_string())?;
        let confidence = response
            .confidence
            .ok_or_else(|| "confidence がありません".to_string())?;
        let all_probabilities = response
            .all_probabilities
            .ok_or_else(|| "all_probabilities がありません".to_string())?;

        Ok(AnalysisOutcome::Success(AnalysisResult {
            tumor_detected,
            confidence,
            all_probabilities,
            tumor_regions: response.tumor_regions,
        }))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Success(result) => Some(result),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failed { error } => Some(error),
        }
    }
}

impl TryFrom<AnalysisResponse> for AnalysisOutcome {
    type Error = String;

    fn try_from(response: AnalysisResponse) -> Result<Self, Self::Error> {
        AnalysisOutcome::from_response(response)
    }
}
