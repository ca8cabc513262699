//! 抽出結果のテキスト表表示
//!
//! 欠落・nullのフィールドは `N/A` で表示する（CSVでは空文字）。

use crate::store::SelectionSet;
use image_extract_common::{compute_columns, display_cell, ExtractionRecord};

/// セルの最大表示幅（文字数）
pub const MAX_CELL_CHARS: usize = 24;

fn fit(value: &str, width: usize) -> String {
    let single_line = value.replace(&['\n', '\r'][..], " ");
    let count = single_line.chars().count();
    if count > width {
        let head: String = single_line.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", head)
    } else {
        format!("{}{}", single_line, " ".repeat(width - count))
    }
}

/// 表を文字列にする。`selection` を渡すと先頭に選択マーク列を付ける
pub fn render_table(records: &[ExtractionRecord], selection: Option<&SelectionSet>) -> String {
    if records.is_empty() {
        return "抽出結果はまだありません".to_string();
    }

    let columns = compute_columns(records);
    let mut headers = vec!["id".to_string(), "sourceName".to_string()];
    headers.extend(columns.iter().cloned());

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let mut row = vec![record.id.to_string(), record.source_name.clone()];
            row.extend(columns.iter().map(|c| display_cell(record, c).to_string()));
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_CHARS)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| fit(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mark = |id: Option<i64>| -> &'static str {
        match (selection, id) {
            (None, _) => "",
            (Some(_), None) => "    ",
            (Some(s), Some(id)) if s.contains(id) => "[x] ",
            (Some(_), Some(_)) => "[ ] ",
        }
    };

    let mut lines = vec![format!("{}{}", mark(None), format_row(&headers))];
    let rule_width: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    lines.push(format!("{}{}", mark(None), "-".repeat(rule_width)));
    for (record, row) in records.iter().zip(rows.iter()) {
        lines.push(format!("{}{}", mark(Some(record.id)), format_row(row)));
    }

    lines.join("\n")
}
