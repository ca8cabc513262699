//! 結合テスト共通のテスト用バックエンド

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use image_extract_common::FieldMap;
use image_extract_rust::extractor::{ExtractionError, Extractor, ImagePayload};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 画像の中身（＝テスト用に書いたファイル名）ごとに決めた結果を返す
#[derive(Default)]
pub struct ScriptedExtractor {
    results: HashMap<String, Result<FieldMap, ExtractionError>>,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(mut self, name: &str, fields: &[(&str, Option<&str>)]) -> Self {
        self.results.insert(name.to_string(), Ok(field_map(fields)));
        self
    }

    pub fn fail(mut self, name: &str, error: ExtractionError) -> Self {
        self.results.insert(name.to_string(), Err(error));
        self
    }

    /// 呼び出された順の画像内容
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(
        &self,
        _api_key: &str,
        image: ImagePayload<'_>,
        prompt: &str,
    ) -> Result<FieldMap, ExtractionError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(image.data_base64)
            .expect("base64が不正");
        let name = String::from_utf8(bytes).expect("UTF-8ではない");

        self.calls.lock().unwrap().push(name.clone());
        self.prompts.lock().unwrap().push(prompt.to_string());

        self.results
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Ok(FieldMap::new()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn field_map(fields: &[(&str, Option<&str>)]) -> FieldMap {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
        .collect()
}

/// 中身がファイル名そのものの画像ファイルを作る
pub fn write_images(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, name.as_bytes()).expect("画像作成失敗");
            path
        })
        .collect()
}
