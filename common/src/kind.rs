//! 解析種別
//!
//! タブ番号→エンドポイントの対応表の代わりに、3種別を列挙型で持つ。
//! 各種別が自身のエンドポイントと対応フォーマットを返す。

use serde::{Deserialize, Serialize};

/// ファイル選択で受け付ける拡張子（全種別の和集合）
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "tif", "tiff", "dcm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    #[default]
    BrainTumor,
    Cancer,
    Alzheimer,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::BrainTumor,
        AnalysisKind::Cancer,
        AnalysisKind::Alzheimer,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisKind::BrainTumor => "/analyze/brain-tumor",
            AnalysisKind::Cancer => "/analyze/cancer",
            AnalysisKind::Alzheimer => "/analyze/alzheimer",
        }
    }

    /// 現在バックエンドが応答するのは脳腫瘍のみ
    pub fn is_enabled(&self) -> bool {
        matches!(self, AnalysisKind::BrainTumor)
    }

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisKind::BrainTumor => "Beyin Tümörü Tespiti",
            AnalysisKind::Cancer => "Kanser Tespiti",
            AnalysisKind::Alzheimer => "Alzheimer Tespiti",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisKind::BrainTumor => "MR görüntülerinde beyin tümörü tespiti yapar.",
            AnalysisKind::Cancer => "Histopatolojik görüntülerde kanser tespiti yapar.",
            AnalysisKind::Alzheimer => "Beyin MR görüntülerinde Alzheimer belirtilerini tespit eder.",
        }
    }

    pub fn formats_label(&self) -> &'static str {
        match self {
            AnalysisKind::BrainTumor | AnalysisKind::Alzheimer => "MR görüntüleri (DICOM, JPG, PNG)",
            AnalysisKind::Cancer => "Mikroskop görüntüleri (JPG, PNG, TIFF)",
        }
    }

    /// 種別ごとの推奨拡張子（小文字）
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            AnalysisKind::BrainTumor | AnalysisKind::Alzheimer => &["dcm", "jpg", "jpeg", "png"],
            AnalysisKind::Cancer => &["jpg", "jpeg", "png", "tif", "tiff"],
        }
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.accepted_extensions().iter().any(|&e| e == ext)
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brain-tumor" | "brain" | "0" => Ok(AnalysisKind::BrainTumor),
            "cancer" | "1" => Ok(AnalysisKind::Cancer),
            "alzheimer" | "2" => Ok(AnalysisKind::Alzheimer),
            _ => Err(format!(
                "Unknown analysis kind: {}. Use brain-tumor, cancer, or alzheimer",
                s
            )),
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisKind::BrainTumor => write!(f, "brain-tumor"),
            AnalysisKind::Cancer => write!(f, "cancer"),
            AnalysisKind::Alzheimer => write!(f, "alzheimer"),
        }
    }
}
