//! APIレスポンスパーサー
//!
//! モデルが返したテキストからJSONを取り出し、
//! フィールド名 → 文字列/null のマップに変換する

use crate::error::{Error, Result};
use crate::types::FieldMap;
use serde_json::{Map, Value};

/// エラーメッセージに載せるレスポンス先頭の最大文字数
const PREVIEW_CHARS: usize = 80;

/// レスポンスからJSON部分を取り出す
///
/// ```json ... ``` ブロックがあれば中身を返し、なければ前後の空白を除いた全体を返す。
///
/// # Examples
/// ```
/// use image_extract_common::extract_json_block;
///
/// let response = "```json\n{\"key\": \"value\"}\n```";
/// assert_eq!(extract_json_block(response), "{\"key\": \"value\"}");
/// ```
pub fn extract_json_block(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start_marker) = trimmed.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = trimmed[start..].find("```") {
            return trimmed[start..start + end_offset].trim();
        }
    }

    // 言語指定なしのフェンス
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }

    trimmed
}

/// レスポンスをフィールドマップにパース
///
/// - 空のレスポンス → `Error::EmptyResponse`
/// - `{` / `[` で始まらない、またはJSONとして不正 → `Error::Parse`
/// - 配列の場合は最初のオブジェクト要素を使う
/// - 文字列はそのまま、`null` は `None`、それ以外の値はJSON表記の文字列にする
pub fn parse_fields(response: &str) -> Result<FieldMap> {
    if response.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    let json_str = extract_json_block(response);
    if !json_str.starts_with('{') && !json_str.starts_with('[') {
        return Err(Error::Parse(format!(
            "JSON形式ではありません: {}",
            preview(json_str)
        )));
    }

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("JSONパースエラー: {}", e)))?;

    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => first_object(items)
            .ok_or_else(|| Error::Parse("配列にJSONオブジェクトがありません".into()))?,
        other => {
            return Err(Error::Parse(format!(
                "JSONオブジェクトではありません: {}",
                preview(&other.to_string())
            )))
        }
    };

    Ok(object
        .into_iter()
        .map(|(key, value)| (key, leaf_to_string(value)))
        .collect())
}

fn first_object(items: Vec<Value>) -> Option<Map<String, Value>> {
    items.into_iter().find_map(|item| match item {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

fn leaf_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", head)
}
