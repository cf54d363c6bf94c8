use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("対応していない形式です: {0}")]
    UnsupportedFormat(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("セッションエラー: {0}")]
    Session(#[from] medscan_common::SessionError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("パネル描画エラー: {0}")]
    Rasterize(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error(transparent)]
    Common(#[from] medscan_common::Error),
}

pub type Result<T> = std::result::Result<T, MedScanError>;
