//! 永続キーバリュー保存領域
//!
//! データディレクトリ直下にキーごとのファイルを置く。
//! 暗号化・有効期限なし。

use crate::error::{ImageExtractError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 抽出結果一覧（JSON配列）
pub const RECORDS_KEY: &str = "extracted_data";
/// Gemini APIキー（平文）
pub const API_KEY_KEY: &str = "gemini_api_key";
/// カスタム指示プロンプト（平文）
pub const PROMPT_KEY: &str = "gemini_custom_prompt";
/// モデル名（平文）
pub const MODEL_KEY: &str = "gemini_model";

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "IMAGE_EXTRACT_DATA_DIR";

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 既定のデータディレクトリ（環境変数 > OSのデータディレクトリ）
    pub fn default_root() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| ImageExtractError::Storage("データディレクトリが見つかりません".into()))?;
        Ok(data_dir.join("image-extract"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// 値を読み込み。未保存なら `None`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 値を保存（一時ファイルに書いてから置き換える）
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;

        let path = self.slot_path(key);
        let tmp_path = self.root.join(format!(".{}.tmp", key));
        std::fs::write(&tmp_path, value)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// 値を削除。存在しなかった場合は `false`
    pub fn remove(&self, key: &str) -> Result<bool> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
