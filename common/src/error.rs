//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 結果パネルのスナップショットが取得できない
    #[error("Rasterize error: {0}")]
    Rasterize(String),

    #[error("Layout error: {0}")]
    Layout(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
