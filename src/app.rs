//! アプリケーション状態
//!
//! 設定・抽出結果・選択状態・処理待ち画像をまとめて持ち、
//! 起動時に保存領域から読み込んで、変更のたびに書き込む。

use crate::batch::{run_batch, BatchObserver, BatchReport};
use crate::config::Config;
use crate::error::Result;
use crate::export::{export_records, ExportFormat, ExportOutcome};
use crate::extractor::Extractor;
use crate::scanner::{ImageFile, PendingSelection};
use crate::storage::Storage;
use crate::store::{RecordStore, SelectionSet};
use image_extract_common::{compute_columns, ExtractionRecord};
use std::path::Path;

pub struct App {
    storage: Storage,
    config: Config,
    records: RecordStore,
    selection: SelectionSet,
    pending: PendingSelection,
    load_warnings: Vec<String>,
}

impl App {
    /// 保存領域から状態を復元
    pub fn init(storage: Storage) -> Result<Self> {
        let (config, mut load_warnings) = Config::load(&storage);
        let records = RecordStore::load(storage.clone());
        load_warnings.extend(records.load_warning().map(str::to_string));

        Ok(Self {
            storage,
            config,
            records,
            selection: SelectionSet::default(),
            pending: PendingSelection::default(),
            load_warnings,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 起動時に保存データ・設定を読めなかった場合の警告
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    // ---- 設定 ----

    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        self.config.set_api_key(&self.storage, key)
    }

    pub fn clear_api_key(&mut self) -> Result<()> {
        self.config.clear_api_key(&self.storage)
    }

    pub fn set_prompt(&mut self, prompt: &str) -> Result<()> {
        self.config.set_prompt(&self.storage, prompt)
    }

    pub fn reset_prompt(&mut self) -> Result<()> {
        self.config.reset_prompt(&self.storage)
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        self.config.set_model(&self.storage, model)
    }

    // ---- 画像選択・抽出 ----

    /// 処理待ち画像を丸ごと置き換える
    pub fn select_files(&mut self, files: Vec<ImageFile>) {
        self.pending.replace(files);
    }

    pub fn pending(&self) -> &PendingSelection {
        &self.pending
    }

    /// 処理待ち画像を一括抽出し、終わったら選択を空にする
    ///
    /// 開始条件を満たさない場合は選択を残したままエラーを返す。
    pub async fn process_batch(
        &mut self,
        extractor: &dyn Extractor,
        observer: &mut dyn BatchObserver,
    ) -> Result<BatchReport> {
        let report = run_batch(
            self.pending.files(),
            &self.config,
            extractor,
            &mut self.records,
            observer,
        )
        .await?;

        self.pending.clear();
        Ok(report)
    }

    // ---- 抽出結果 ----

    pub fn records(&self) -> &[ExtractionRecord] {
        self.records.list()
    }

    /// 表の列（全フィールド名の和集合）
    pub fn columns(&self) -> Vec<String> {
        compute_columns(self.records.list())
    }

    /// 1行削除（確認なし）
    pub fn delete_row(&mut self, id: i64) -> bool {
        let removed = self.records.delete_one(id);
        self.selection.retain_existing(&self.records);
        removed
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// 行の選択を切り替える。存在しないIDは `false`
    pub fn set_selected(&mut self, id: i64, checked: bool) -> bool {
        if checked && !self.records.contains(id) {
            return false;
        }
        self.selection.set(id, checked);
        true
    }

    /// 全行を選択／全解除
    pub fn select_all(&mut self, checked: bool) {
        if checked {
            self.selection.replace_all(self.records.ids());
        } else {
            self.selection.clear();
        }
    }

    pub fn is_all_selected(&self) -> bool {
        !self.records.is_empty() && self.selection.len() == self.records.len()
    }

    /// 選択行を削除。`confirm` に件数を渡し、`true` の場合のみ削除する
    pub fn delete_selected(&mut self, confirm: impl FnOnce(usize) -> bool) -> usize {
        if self.selection.is_empty() || !confirm(self.selection.len()) {
            return 0;
        }

        let removed = self.records.delete_many(self.selection.ids());
        self.selection.clear();
        removed
    }

    /// 全削除。`confirm` に件数を渡し、`true` の場合のみ削除する
    pub fn clear_all(&mut self, confirm: impl FnOnce(usize) -> bool) -> usize {
        if self.records.is_empty() || !confirm(self.records.len()) {
            return 0;
        }

        let removed = self.records.clear_all();
        self.selection.clear();
        removed
    }

    /// 抽出結果をファイルに出力。空の場合はファイルを作らない
    pub fn export(&self, format: ExportFormat, output: Option<&Path>) -> Result<ExportOutcome> {
        export_records(self.records.list(), format, output)
    }
}
