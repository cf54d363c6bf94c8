use crate::error::{MedScanError, Result};
use medscan_common::layout::SUPERSAMPLE;
use medscan_common::{ReportLabels, CONTAINER_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// バックエンドURLの環境変数
pub const BACKEND_URL_ENV: &str = "MEDSCAN_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub timeout_seconds: u64,
    pub container_width: f64,
    pub supersample: f32,
    pub jpeg_quality: u8,
    pub output_dir: Option<PathBuf>,
    /// レポート文言の差し替え（未指定の項目は既定のトルコ語）
    pub labels: ReportLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            timeout_seconds: 120,
            container_width: CONTAINER_WIDTH,
            supersample: SUPERSAMPLE,
            jpeg_quality: 100,
            output_dir: None,
            labels: ReportLabels::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MedScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("medscan").join("config.json"))
    }

    /// 環境変数を優先
    pub fn backend_url(&self) -> String {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => self.backend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MedScanError::Config(format!("URLが不正です: {}", url)));
        }
        self.backend_url = url;
        self.save()
    }
}
