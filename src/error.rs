use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageExtractError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Gemini APIキーが設定されていません。`image-extract config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("画像が選択されていません。処理する画像ファイルまたはフォルダを指定してください")]
    EmptySelection,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("保存領域エラー: {0}")]
    Storage(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] image_extract_common::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),
}

impl ImageExtractError {
    /// 処理開始前の設定不足（APIキー未設定・画像未選択）
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::EmptySelection)
    }
}

pub type Result<T> = std::result::Result<T, ImageExtractError>;
