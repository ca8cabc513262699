//! 抽出結果の型定義
//!
//! CLIと保存データで共有される型:
//! - FieldMap: 1枚の画像から抽出したフィールド名 → 値（null可）
//! - ExtractionRecord: 表の1行（ID・元ファイル名・フィールド）

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// フィールド名 → 値。`None` はモデルが `null` を返したことを表す
pub type FieldMap = BTreeMap<String, Option<String>>;

/// 抽出結果1件（表の1行）
///
/// 作成後は変更されず、削除のみ行われる。
/// 旧データの `imageName` / `data` キーも読み込める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    pub id: i64,

    #[serde(alias = "imageName")]
    pub source_name: String,

    #[serde(default, alias = "data")]
    pub fields: FieldMap,
}

impl ExtractionRecord {
    pub fn new(id: i64, source_name: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id,
            source_name: source_name.into(),
            fields,
        }
    }

    /// フィールド値を取得（欠落・nullはどちらも `None`）
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }
}
