//! Gemini APIクライアントのHTTPレベルテスト
//!
//! wiremockでgenerateContentエンドポイントを立て、
//! リクエスト内容と失敗種別の振り分けを検証する。

use image_extract_rust::extractor::{ExtractionError, Extractor, GeminiClient, ImagePayload};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn payload() -> ImagePayload<'static> {
    ImagePayload {
        data_base64: "aW1hZ2U=",
        mime_type: "image/jpeg",
    }
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

fn error_response(code: u16, message: &str, status: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}

async fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&server.uri(), MODEL).expect("クライアント作成失敗")
}

#[tokio::test]
async fn test_extract_success_keeps_null_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response(r#"{"name": "Acme", "date": null}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let fields = client
        .extract("test-key", payload(), "名前と日付を抽出")
        .await
        .expect("抽出に失敗");

    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get("name"), Some(&Some("Acme".to_string())));
    assert_eq!(fields.get("date"), Some(&None));
}

#[tokio::test]
async fn test_request_carries_prompt_and_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(r#"{"a": "1"}"#)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .extract("test-key", payload(), "カスタム指示")
        .await
        .expect("抽出に失敗");

    let requests = server.received_requests().await.expect("リクエスト記録なし");
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).expect("JSONではない");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "カスタム指示");
    assert_eq!(body["contents"][0]["parts"][0]["inline_data"]["mime_type"], "image/jpeg");
    assert_eq!(body["contents"][0]["parts"][0]["inline_data"]["data"], "aW1hZ2U=");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_fenced_json_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("```json\n{\"total\": 1200}\n```")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let fields = client.extract("test-key", payload(), "p").await.expect("抽出に失敗");
    assert_eq!(fields.get("total"), Some(&Some("1200".to_string())));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_response(
            429,
            "Resource has been exhausted (e.g. check quota).",
            "RESOURCE_EXHAUSTED",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("test-key", payload(), "p").await.unwrap_err();
    assert_eq!(err, ExtractionError::RateLimited);
}

#[tokio::test]
async fn test_invalid_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_response(
            400,
            "API key not valid. Please pass a valid API key.",
            "INVALID_ARGUMENT",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("bad-key", payload(), "p").await.unwrap_err();
    assert_eq!(err, ExtractionError::InvalidCredential);
}

#[tokio::test]
async fn test_other_http_error_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_response(
            500,
            "Internal error encountered.",
            "INTERNAL",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.extract("test-key", payload(), "p").await {
        Err(ExtractionError::Unknown(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("Internal error encountered."));
        }
        other => panic!("Unknownになっていない: {:?}", other),
    }
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("test-key", payload(), "p").await.unwrap_err();
    assert_eq!(err, ExtractionError::EmptyResponse);
}

#[tokio::test]
async fn test_blank_text_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("   \n")))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("test-key", payload(), "p").await.unwrap_err();
    assert_eq!(err, ExtractionError::EmptyResponse);
}

#[tokio::test]
async fn test_prose_is_invalid_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("申し訳ありませんが、この画像には文字がありません。")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("test-key", payload(), "p").await.unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidResponseFormat(_)));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.extract("  ", payload(), "p").await.unwrap_err();
    assert_eq!(err, ExtractionError::MissingCredential);
}
