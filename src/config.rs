//! APIキー・指示プロンプトの保存
//!
//! 値は変更のたびに保存領域へ書き込む。

use crate::error::Result;
use crate::extractor::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::storage::{Storage, API_KEY_KEY, MODEL_KEY, PROMPT_KEY};
use image_extract_common::DEFAULT_PROMPT;
use tracing::warn;

/// 保存済みキーより優先されるAPIキー
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// APIのベースURLを上書きする環境変数
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub prompt: String,
    pub model: String,
    pub api_base: String,
    /// `api_key` が環境変数由来か
    pub api_key_from_env: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            prompt: DEFAULT_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key_from_env: false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 設定スロットを読む。読めない場合は警告を積んで `None`
fn read_slot(storage: &Storage, key: &str, warnings: &mut Vec<String>) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            let message = format!("設定 {} を読み込めないため既定値を使います: {}", key, e);
            warn!("{}", message);
            warnings.push(message);
            None
        }
    }
}

impl Config {
    /// 保存領域から読み込み。未保存・空・読めない値は既定値になる
    ///
    /// 読めなかったスロットの警告も返す。
    pub fn load(storage: &Storage) -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(key) = read_slot(storage, API_KEY_KEY, &mut warnings) {
            config.api_key = key.trim().to_string();
        }
        if let Some(prompt) = non_empty(read_slot(storage, PROMPT_KEY, &mut warnings)) {
            config.prompt = prompt;
        }
        if let Some(model) = non_empty(read_slot(storage, MODEL_KEY, &mut warnings)) {
            config.model = model.trim().to_string();
        }

        // 環境変数を優先
        if let Some(key) = non_empty(std::env::var(API_KEY_ENV).ok()) {
            config.api_key = key.trim().to_string();
            config.api_key_from_env = true;
        }
        if let Some(base) = non_empty(std::env::var(API_BASE_ENV).ok()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }

        (config, warnings)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn set_api_key(&mut self, storage: &Storage, key: &str) -> Result<()> {
        let key = key.trim();
        storage.set(API_KEY_KEY, key)?;
        self.api_key = key.to_string();
        self.api_key_from_env = false;
        Ok(())
    }

    pub fn clear_api_key(&mut self, storage: &Storage) -> Result<()> {
        storage.remove(API_KEY_KEY)?;
        self.api_key.clear();
        self.api_key_from_env = false;
        Ok(())
    }

    pub fn set_prompt(&mut self, storage: &Storage, prompt: &str) -> Result<()> {
        storage.set(PROMPT_KEY, prompt)?;
        self.prompt = if prompt.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            prompt.to_string()
        };
        Ok(())
    }

    /// 既定のプロンプトに戻す
    pub fn reset_prompt(&mut self, storage: &Storage) -> Result<()> {
        storage.remove(PROMPT_KEY)?;
        self.prompt = DEFAULT_PROMPT.to_string();
        Ok(())
    }

    pub fn is_default_prompt(&self) -> bool {
        self.prompt == DEFAULT_PROMPT
    }

    pub fn set_model(&mut self, storage: &Storage, model: &str) -> Result<()> {
        let model = model.trim();
        storage.set(MODEL_KEY, model)?;
        self.model = if model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };
        Ok(())
    }

    /// 表示用に伏せたAPIキー（先頭4文字・末尾4文字のみ）
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return "未設定".to_string();
        }
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}
