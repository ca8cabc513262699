//! 画像1枚 → フィールドマップの抽出
//!
//! `Extractor` トレイトを境界にして、バッチ処理をAPI実装から切り離す。

pub mod gemini;

use async_trait::async_trait;
use image_extract_common::FieldMap;
use thiserror::Error;

pub use gemini::GeminiClient;

/// 抽出呼び出しの失敗種別
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Gemini APIキーが指定されていません")]
    MissingCredential,

    #[error("APIから空のレスポンスが返されました。画像が不鮮明か、文字が含まれていない可能性があります")]
    EmptyResponse,

    #[error("APIが有効なJSON形式を返しませんでした。プロンプトと画像を確認してください ({0})")]
    InvalidResponseFormat(String),

    #[error("Gemini APIキーが無効です。確認して再試行してください")]
    InvalidCredential,

    #[error("APIのレート制限を超えました。しばらく待ってから再試行してください")]
    RateLimited,

    #[error("画像からのデータ抽出に失敗しました: {0}")]
    Unknown(String),
}

impl From<image_extract_common::Error> for ExtractionError {
    fn from(err: image_extract_common::Error) -> Self {
        use image_extract_common::Error;
        match err {
            Error::EmptyResponse => ExtractionError::EmptyResponse,
            Error::Parse(message) => ExtractionError::InvalidResponseFormat(message),
            Error::Json(e) => ExtractionError::InvalidResponseFormat(e.to_string()),
            other => ExtractionError::Unknown(other.to_string()),
        }
    }
}

/// APIに送る画像（Base64 + MIMEタイプ）
#[derive(Debug, Clone, Copy)]
pub struct ImagePayload<'a> {
    pub data_base64: &'a str,
    pub mime_type: &'a str,
}

/// 画像と指示プロンプトからフィールドを抽出するバックエンド
#[async_trait]
pub trait Extractor: Send + Sync {
    /// 1枚の画像を抽出。プロンプトはシステム指示として渡す
    async fn extract(
        &self,
        api_key: &str,
        image: ImagePayload<'_>,
        prompt: &str,
    ) -> Result<FieldMap, ExtractionError>;

    fn model_name(&self) -> &str;
}
