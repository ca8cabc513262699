//! 選択画像の一括抽出
//!
//! 1枚ずつ順番に処理し、成功したらその場で結果を保存する。
//! 1枚の失敗ではバッチを止めず、ファイル名付きのエラーとして残して次へ進む。

use crate::config::Config;
use crate::error::{ImageExtractError, Result};
use crate::extractor::{ExtractionError, Extractor, ImagePayload};
use crate::scanner::ImageFile;
use crate::store::RecordStore;
use base64::Engine;
use image_extract_common::ExtractionRecord;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// 1ファイル分の失敗理由
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileFailure {
    #[error("画像読み込みエラー: {0}")]
    Read(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// ファイル名付きの失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file_name: String,
    pub failure: FileFailure,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} の処理に失敗しました: {}", self.file_name, self.failure)
    }
}

/// 1ファイルの結果。成功時は追加したレコードのID
pub type FileOutcome = std::result::Result<i64, FileError>;

/// バッチ全体の結果（選択順）
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn record_ids(&self) -> Vec<i64> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok().copied()).collect()
    }

    pub fn errors(&self) -> Vec<&FileError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// 進捗の通知先
pub trait BatchObserver {
    fn on_file_start(&mut self, _index: usize, _total: usize, _file_name: &str) {}
    fn on_file_success(&mut self, _record: &ExtractionRecord) {}
    fn on_file_failure(&mut self, _error: &FileError) {}
    fn on_batch_finish(&mut self, _report: &BatchReport) {}
}

/// 通知を捨てる
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// 進捗表示 `処理中 i/N: name`（iは1始まり）
pub fn progress_message(index: usize, total: usize, file_name: &str) -> String {
    format!("処理中 {}/{}: {}", index + 1, total, file_name)
}

async fn read_base64(image: &ImageFile) -> std::result::Result<String, FileFailure> {
    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|e| FileFailure::Read(format!("{}: {}", image.path.display(), e)))?;
    // 空ファイルも空データのままAPIに渡す
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

async fn process_file(
    image: &ImageFile,
    config: &Config,
    extractor: &dyn Extractor,
) -> std::result::Result<image_extract_common::FieldMap, FileFailure> {
    let data_base64 = read_base64(image).await?;
    let payload = ImagePayload {
        data_base64: &data_base64,
        mime_type: image.mime_type,
    };
    Ok(extractor.extract(&config.api_key, payload, &config.prompt).await?)
}

/// 選択画像を順番に抽出し、成功分をその場でストアに追加する
///
/// APIキー未設定・選択なしの場合は何もせずエラーを返す。
pub async fn run_batch(
    files: &[ImageFile],
    config: &Config,
    extractor: &dyn Extractor,
    records: &mut RecordStore,
    observer: &mut dyn BatchObserver,
) -> Result<BatchReport> {
    if !config.has_api_key() {
        return Err(ImageExtractError::MissingApiKey);
    }
    if files.is_empty() {
        return Err(ImageExtractError::EmptySelection);
    }

    let total = files.len();
    let mut report = BatchReport::default();
    info!(total, model = extractor.model_name(), "バッチ処理開始");

    for (index, image) in files.iter().enumerate() {
        observer.on_file_start(index, total, &image.file_name);

        match process_file(image, config, extractor).await {
            Ok(fields) => {
                let id = records.create(index, &image.file_name, fields);
                if let Some(record) = records.get(id) {
                    observer.on_file_success(record);
                }
                report.outcomes.push(Ok(id));
            }
            Err(failure) => {
                let error = FileError {
                    file_name: image.file_name.clone(),
                    failure,
                };
                warn!("{}", error);
                observer.on_file_failure(&error);
                report.outcomes.push(Err(error));
            }
        }
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "バッチ処理完了"
    );
    observer.on_batch_finish(&report);

    Ok(report)
}
