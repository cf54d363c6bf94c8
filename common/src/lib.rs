//! MedScan Common Library
//!
//! CLIと描画/出力処理で共有される型と純粋ロジック:
//! 表示設定、エフェクト記述子、オーバーレイ座標変換、レポート出力コア、セッション

pub mod effect;
pub mod error;
pub mod export;
pub mod kind;
pub mod layout;
pub mod overlay;
pub mod session;
pub mod settings;
pub mod types;

pub use effect::{render_effect, Matrix2, VisualEffect};
pub use error::{Error, Result};
pub use export::{DocumentLayout, ReportLabels};
pub use kind::AnalysisKind;
pub use overlay::{map_regions, DisplayGeometry, ImageHandle, Overlay, OverlayRect, CONTAINER_WIDTH};
pub use session::{AnalysisTicket, ImageGeneration, Session, SessionError};
pub use settings::ImageSettings;
pub use types::{AnalysisOutcome, AnalysisResponse, AnalysisResult, Probabilities, Region};
