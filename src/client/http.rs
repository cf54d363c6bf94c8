use super::AnalysisClient;
use crate::error::{MedScanError, Result};
use medscan_common::{AnalysisKind, AnalysisResponse};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// multipartでバックエンドへ画像をアップロードする
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| MedScanError::ApiCall(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, kind: AnalysisKind) -> String {
        format!("{}{}", self.base_url, kind.endpoint())
    }
}

impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, kind: AnalysisKind, image: &Path) -> Result<AnalysisResponse> {
        let bytes = tokio::fs::read(image).await?;
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let url = self.endpoint_url(kind);
        debug!(%url, "解析リクエスト送信");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MedScanError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MedScanError::ApiCall(format!("{}: {}", status, text)));
        }

        response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| MedScanError::ApiParse(e.to_string()))
    }
}
