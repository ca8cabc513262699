//! Gemini API連携
//!
//! 画像1枚をインラインデータとして送り、指示プロンプトをシステム指示として渡す。
//! レスポンススキーマは指定せず、出力の形はプロンプトに任せる。

use super::{ExtractionError, Extractor, ImagePayload};
use crate::error::{ImageExtractError, Result};
use async_trait::async_trait;
use image_extract_common::{parse_fields, FieldMap, EXTRACTION_INSTRUCTION};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// エラーメッセージに載せるレスポンス本文の最大文字数
const ERROR_BODY_CHARS: usize = 200;

/// Gemini APIリクエスト
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize, Default)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// エラーレスポンス `{"error": {"code", "message", "status"}}`
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

fn build_request(image: ImagePayload<'_>, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        system_instruction: Content {
            parts: vec![Part::Text {
                text: prompt.to_string(),
            }],
        },
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.to_string(),
                        data: image.data_base64.to_string(),
                    },
                },
                Part::Text {
                    text: EXTRACTION_INSTRUCTION.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}…", text.chars().take(max_chars).collect::<String>())
    }
}

/// HTTPエラーを失敗種別に振り分ける
pub fn classify_failure(status: u16, body: &str) -> ExtractionError {
    let detail = serde_json::from_str::<ApiErrorBody>(body).ok().map(|b| b.error);
    let api_status = detail.as_ref().map(|d| d.status.as_str()).unwrap_or("");

    if status == 429 || api_status == "RESOURCE_EXHAUSTED" || body.contains("RESOURCE_EXHAUSTED") {
        return ExtractionError::RateLimited;
    }
    if body.contains("API key not valid") || body.contains("API_KEY_INVALID") || status == 401 || status == 403 {
        return ExtractionError::InvalidCredential;
    }

    let message = match detail {
        Some(d) if !d.message.is_empty() => d.message,
        _ => truncate(body.trim(), ERROR_BODY_CHARS),
    };
    ExtractionError::Unknown(format!("HTTP {}: {}", status, message))
}

/// Gemini `generateContent` クライアント
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ImageExtractError::Config(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl Extractor for GeminiClient {
    async fn extract(
        &self,
        api_key: &str,
        image: ImagePayload<'_>,
        prompt: &str,
    ) -> std::result::Result<FieldMap, ExtractionError> {
        if api_key.trim().is_empty() {
            return Err(ExtractionError::MissingCredential);
        }

        let request = build_request(image, prompt);
        debug!(
            model = %self.model,
            mime_type = image.mime_type,
            base64_len = image.data_base64.len(),
            "Gemini API呼び出し"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.trim())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionError::Unknown(format!("リクエスト失敗: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Unknown(format!("レスポンス読み込み失敗: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini APIエラー: {}", truncate(&body, ERROR_BODY_CHARS));
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractionError::Unknown(format!("レスポンス解析失敗: {}", e)))?;
        let text = parsed.text();
        debug!(text_len = text.len(), "Gemini APIレスポンス受信");

        Ok(parse_fields(&text)?)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
