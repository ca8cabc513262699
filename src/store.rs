//! 抽出結果の保存と選択状態
//!
//! すべての変更は直後に一覧全体を保存領域へ書き込む。
//! 書き込み失敗は警告ログのみで処理は続ける。

use crate::storage::{Storage, RECORDS_KEY};
use image_extract_common::{ExtractionRecord, FieldMap};
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub struct RecordStore {
    storage: Storage,
    records: Vec<ExtractionRecord>,
    last_id: i64,
    load_warning: Option<String>,
}

impl RecordStore {
    /// 保存領域から読み込み
    ///
    /// 保存データが壊れている場合は空の一覧で始め、警告を残す。
    /// 壊れたデータは次の変更まで上書きしない。
    pub fn load(storage: Storage) -> Self {
        let (records, load_warning) = match storage.get(RECORDS_KEY) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<ExtractionRecord>>(&content) {
                Ok(records) => (records, None),
                Err(e) => {
                    let message = format!("保存済みデータの解析に失敗したため空の一覧で開始します: {}", e);
                    warn!("{}", message);
                    (Vec::new(), Some(message))
                }
            },
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                let message = format!("保存済みデータを読み込めないため空の一覧で開始します: {}", e);
                warn!("{}", message);
                (Vec::new(), Some(message))
            }
        };

        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);

        Self {
            storage,
            records,
            last_id,
            load_warning,
        }
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn list(&self) -> &[ExtractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&ExtractionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(|r| r.id)
    }

    /// 新しいID（現在時刻ミリ秒 + バッチ内の順番。既存IDより必ず大きい）
    pub fn next_id(&mut self, offset: usize) -> i64 {
        let candidate = chrono::Utc::now().timestamp_millis() + offset as i64;
        let id = candidate.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// 新しいレコードを作って末尾に追加し、IDを返す
    pub fn create(&mut self, offset: usize, source_name: &str, fields: FieldMap) -> i64 {
        let id = self.next_id(offset);
        self.append(ExtractionRecord::new(id, source_name, fields));
        id
    }

    pub fn append(&mut self, record: ExtractionRecord) {
        self.last_id = self.last_id.max(record.id);
        self.records.push(record);
        self.persist();
    }

    /// 1件削除。存在しなかった場合は `false`
    pub fn delete_one(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// まとめて削除し、削除件数を返す
    pub fn delete_many(&mut self, ids: &BTreeSet<i64>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// 全削除。呼び出し側で確認を取ってから呼ぶこと
    pub fn clear_all(&mut self) -> usize {
        let removed = self.records.len();
        if removed > 0 {
            self.records.clear();
            self.persist();
        }
        removed
    }

    fn persist(&self) {
        let content = match serde_json::to_string(&self.records) {
            Ok(c) => c,
            Err(e) => {
                warn!("抽出結果のシリアライズに失敗: {}", e);
                return;
            }
        };

        match self.storage.set(RECORDS_KEY, &content) {
            Ok(()) => debug!(count = self.records.len(), "抽出結果を保存"),
            Err(e) => warn!("抽出結果の保存に失敗: {}", e),
        }
    }
}

/// まとめて操作するために選択中のレコードID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn set(&mut self, id: i64, checked: bool) {
        if checked {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 存在しなくなったIDを取り除く
    pub fn retain_existing(&mut self, store: &RecordStore) {
        self.ids.retain(|id| store.contains(*id));
    }
}
