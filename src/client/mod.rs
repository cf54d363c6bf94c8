//! 解析リクエスト
//!
//! 通信は `AnalysisClient` の実装に任せ、ここでは失敗を
//! `AnalysisOutcome::Failed` へ変換する。リトライはしない。

mod http;

pub use http::HttpAnalysisClient;

use crate::error::Result;
use medscan_common::{AnalysisKind, AnalysisOutcome, AnalysisResponse};
use std::path::Path;
use tracing::{debug, error};

/// 画像を送信して解析結果を受け取る
#[allow(async_fn_in_trait)]
pub trait AnalysisClient {
    async fn analyze(&self, kind: AnalysisKind, image: &Path) -> Result<AnalysisResponse>;
}

/// 解析を1回実行し、どんな失敗も結果の値として返す
pub async fn request_analysis<C: AnalysisClient>(
    client: &C,
    kind: AnalysisKind,
    image: &Path,
) -> AnalysisOutcome {
    match client.analyze(kind, image).await {
        Ok(response) => match AnalysisOutcome::from_response(response) {
            Ok(outcome) => {
                debug!(%kind, failed = outcome.error().is_some(), "解析レスポンス受信");
                outcome
            }
            Err(e) => {
                error!(%kind, "レスポンス形式が不正です: {}", e);
                AnalysisOutcome::failed(AnalysisOutcome::REQUEST_FAILED)
            }
        },
        Err(e) => {
            error!(%kind, "解析中にエラーが発生しました: {}", e);
            AnalysisOutcome::failed(AnalysisOutcome::REQUEST_FAILED)
        }
    }
}
