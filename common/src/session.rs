//! セッション状態
//!
//! 画像選択・寸法確定・表示設定・解析リクエスト・結果受信を
//! 1つの値で管理する。各遷移はフィールドを丸ごと置き換える。
//!
//! 非同期境界（画像デコード、解析リクエスト）の完了通知は
//! 世代番号/チケットで照合し、古い通知は無視する。

use crate::effect::VisualEffect;
use crate::kind::AnalysisKind;
use crate::overlay::{map_regions, DisplayGeometry, ImageHandle, Overlay, CONTAINER_WIDTH};
use crate::settings::ImageSettings;
use crate::types::AnalysisOutcome;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("画像が選択されていません")]
    NoImageSelected,

    #[error("解析中です")]
    AnalysisPending,

    #[error("この解析種別は現在利用できません: {0}")]
    KindDisabled(AnalysisKind),
}

/// 画像デコード完了の照合用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeneration(u64);

/// 解析リクエストの照合用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    id: u64,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    kind: AnalysisKind,
    image: Option<ImageHandle>,
    generation: u64,
    settings: ImageSettings,
    pending: Option<AnalysisTicket>,
    next_ticket: u64,
    outcome: Option<AnalysisOutcome>,
    container_width: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnalysisKind::default())
    }
}

impl Session {
    pub fn new(kind: AnalysisKind) -> Self {
        Self::with_container_width(kind, CONTAINER_WIDTH)
    }

    pub fn with_container_width(kind: AnalysisKind, container_width: f64) -> Self {
        Self {
            kind,
            image: None,
            generation: 0,
            settings: ImageSettings::default(),
            pending: None,
            next_ticket: 0,
            outcome: None,
            container_width,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn settings(&self) -> ImageSettings {
        self.settings
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// 画像を選択（寸法は未確定、結果は破棄、設定は既定値）
    pub fn select_image(&mut self, source: impl Into<String>) -> ImageGeneration {
        self.generation += 1;
        self.image = Some(ImageHandle::pending(source));
        self.settings = ImageSettings::default();
        self.outcome = None;
        self.pending = None;
        ImageGeneration(self.generation)
    }

    /// 画像デコード完了。現在の画像でなければ false
    pub fn image_loaded(&mut self, generation: ImageGeneration, width: u32, height: u32) -> bool {
        if generation.0 != self.generation {
            return false;
        }
        match self.image.take() {
            Some(image) => {
                self.image = Some(image.with_dimensions(width, height));
                true
            }
            None => false,
        }
    }

    pub fn remove_image(&mut self) {
        self.generation += 1;
        self.image = None;
        self.settings = ImageSettings::default();
        self.outcome = None;
        self.pending = None;
    }

    /// 種別の切り替えは画像と結果を破棄する
    pub fn change_kind(&mut self, kind: AnalysisKind) {
        self.remove_image();
        self.kind = kind;
    }

    pub fn update_settings(&mut self, update: impl FnOnce(ImageSettings) -> ImageSettings) {
        self.settings = update(self.settings);
    }

    pub fn reset_settings(&mut self) {
        self.settings = self.settings.reset();
    }

    /// 解析開始。同時に1件まで
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::AnalysisPending);
        }
        if self.image.is_none() {
            return Err(SessionError::NoImageSelected);
        }
        if !self.kind.is_enabled() {
            return Err(SessionError::KindDisabled(self.kind));
        }

        self.next_ticket += 1;
        let ticket = AnalysisTicket {
            id: self.next_ticket,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        Ok(ticket)
    }

    /// 解析完了。保留中のチケットと一致しなければ破棄して false
    pub fn complete_analysis(&mut self, ticket: AnalysisTicket, outcome: AnalysisOutcome) -> bool {
        if self.pending != Some(ticket) || ticket.generation != self.generation {
            return false;
        }
        self.pending = None;
        self.outcome = Some(outcome);
        true
    }

    pub fn display_geometry(&self) -> DisplayGeometry {
        match &self.image {
            Some(image) => DisplayGeometry::compute(image, self.container_width),
            None => DisplayGeometry::default(),
        }
    }

    /// 腫瘍ありかつ領域がある場合のみ矩形を含む
    pub fn overlay(&self) -> Overlay {
        let Some(image) = &self.image else {
            return Overlay::default();
        };
        let regions = self
            .outcome
            .as_ref()
            .and_then(|o| o.result())
            .filter(|r| r.has_regions())
            .map(|r| r.tumor_regions.as_slice())
            .unwrap_or(&[]);
        map_regions(image, self.container_width, regions)
    }

    pub fn visual_effect(&self) -> VisualEffect {
        VisualEffect::from_settings(&self.settings)
    }
}
