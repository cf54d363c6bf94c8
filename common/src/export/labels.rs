//! レポートに出力する文言

use super::format_percent;
use serde::{Deserialize, Serialize};

/// レポート文言一式（既定はトルコ語）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportLabels {
    /// PDFヘッダーのタイトル
    pub document_title: String,
    /// CSV先頭行のタイトル
    pub table_title: String,
    pub date: String,
    pub analysis_type: String,
    pub verdict: String,
    pub detected: String,
    pub not_detected: String,
    pub confidence: String,
    pub probabilities: String,
    pub tumor: String,
    pub normal: String,
    /// 結果パネル下部の注意書き
    pub advice_detected: String,
    pub advice_not_detected: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::turkish()
    }
}

impl ReportLabels {
    pub fn turkish() -> Self {
        Self {
            document_title: "Tıbbi Görüntü Analizi Raporu".into(),
            table_title: "Tıbbi Görüntü Analizi Sonuçları".into(),
            date: "Tarih".into(),
            analysis_type: "Analiz Tipi".into(),
            verdict: "Sonuç".into(),
            detected: "Tümör Tespit Edildi".into(),
            not_detected: "Tümör Tespit Edilmedi".into(),
            confidence: "Güven Oranı".into(),
            probabilities: "Olasılık Değerleri".into(),
            tumor: "Tümör".into(),
            normal: "Normal".into(),
            advice_detected: "Görüntüde tümör belirtisi tespit edildi. Lütfen bir sağlık kuruluşuna başvurun."
                .into(),
            advice_not_detected:
                "Görüntüde tümör belirtisi tespit edilmedi. Ancak düzenli kontrolleri ihmal etmeyin."
                    .into(),
        }
    }

    pub fn verdict_text(&self, tumor_detected: bool) -> &str {
        if tumor_detected {
            &self.detected
        } else {
            &self.not_detected
        }
    }

    pub fn advice_text(&self, tumor_detected: bool) -> &str {
        if tumor_detected {
            &self.advice_detected
        } else {
            &self.advice_not_detected
        }
    }

    /// PDFヘッダーの日付行
    pub fn date_line(&self, date: &str) -> String {
        format!("{}: {}", self.date, date)
    }

    /// "Güven Oranı: 87.00%"
    pub fn confidence_line(&self, confidence: f64) -> String {
        format!("{}: {}", self.confidence, format_percent(confidence))
    }

    /// "Tümör: 87.00%"
    pub fn probability_line(&self, label: &str, value: f64) -> String {
        format!("{}: {}", label, format_percent(value))
    }
}
