//! 画像ファイルの確認と読み込み
//!
//! デコードは `image` クレートに任せる。寸法取得はブロッキングなので
//! 別スレッドで行い、完了を待つ側はセッションに通知する。

use crate::error::{MedScanError, Result};
use image::DynamicImage;
use medscan_common::kind::ACCEPTED_EXTENSIONS;
use medscan_common::AnalysisKind;
use std::path::Path;
use tracing::{debug, warn};

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// 受け付ける拡張子か（大文字小文字は区別しない）
pub fn is_accepted_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|&e| e == ext)
}

/// ファイル選択時の確認（種別の推奨外は警告のみ）
pub fn check_image_file(path: &Path, kind: AnalysisKind) -> Result<()> {
    if !path.is_file() {
        return Err(MedScanError::FileNotFound(path.display().to_string()));
    }

    let ext = extension_of(path).unwrap_or_default();
    if !is_accepted_extension(&ext) {
        return Err(MedScanError::UnsupportedFormat(path.display().to_string()));
    }
    if !kind.accepts_extension(&ext) {
        warn!(%kind, ext = %ext, "推奨外の形式です: {}", kind.formats_label());
    }
    Ok(())
}

/// 画像の実寸を取得
pub async fn load_dimensions(path: &Path) -> Result<(u32, u32)> {
    let owned = path.to_path_buf();
    let dims = tokio::task::spawn_blocking(move || image::image_dimensions(&owned))
        .await
        .map_err(|e| MedScanError::ImageLoad(format!("読み込みタスク失敗: {}", e)))??;
    debug!(path = %path.display(), width = dims.0, height = dims.1, "画像寸法を取得");
    Ok(dims)
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(MedScanError::FileNotFound(path.display().to_string()));
    }
    image::open(path).map_err(|e| MedScanError::ImageLoad(format!("{}: {}", path.display(), e)))
}
