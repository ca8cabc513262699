//! 表変換（列スキーマ・CSV）
//!
//! 列は常に全レコードのフィールド名の和集合をソートしたもの。
//! 保存はせず、表示・出力のたびに計算し直す。

use crate::types::ExtractionRecord;
use std::collections::BTreeSet;

/// 表表示で欠落/nullフィールドの代わりに出す文字列
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// 固定列（フィールド列の前に並ぶ）
pub const FIXED_HEADERS: [&str; 2] = ["id", "sourceName"];

/// 全レコードのフィールド名の和集合（ソート・重複なし）
pub fn compute_columns(records: &[ExtractionRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.fields.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 表表示用のセル値（欠落・nullは `N/A`）
pub fn display_cell<'a>(record: &'a ExtractionRecord, column: &str) -> &'a str {
    record.field(column).unwrap_or(MISSING_PLACEHOLDER)
}

/// 出力用のセル値（欠落・nullは空文字）
pub fn export_cell<'a>(record: &'a ExtractionRecord, column: &str) -> &'a str {
    record.field(column).unwrap_or("")
}

/// ヘッダー行（固定列 + フィールド列）
pub fn header_row(columns: &[String]) -> Vec<String> {
    FIXED_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(columns.iter().cloned())
        .collect()
}

/// ダブルクォートで囲み、内部の `"` を `""` にする
pub fn quote_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// ヘッダーセル。区切り文字等を含む場合のみクォート
fn header_cell(name: &str) -> String {
    if name.contains(&[',', '"', '\n', '\r'][..]) {
        quote_csv(name)
    } else {
        name.to_string()
    }
}

/// レコード一覧をCSV文字列に変換
///
/// ヘッダー: `id,sourceName,<ソート済みフィールド名...>`
/// データ行: idはそのまま、元ファイル名と各フィールドはクォートする。
pub fn to_csv(records: &[ExtractionRecord]) -> String {
    let columns = compute_columns(records);

    let mut csv = header_row(&columns)
        .iter()
        .map(|h| header_cell(h))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');

    for record in records {
        let row: Vec<String> = std::iter::once(record.id.to_string())
            .chain(std::iter::once(quote_csv(&record.source_name)))
            .chain(columns.iter().map(|c| quote_csv(export_cell(record, c))))
            .collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldMap;

    fn record(id: i64, name: &str, fields: &[(&str, Option<&str>)]) -> ExtractionRecord {
        let map: FieldMap = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
            .collect();
        ExtractionRecord::new(id, name, map)
    }

    /// テスト用の簡易CSVパーサー（クォート・""・改行入りセル対応）
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        cell.push('"');
                    }
                    '"' => in_quotes = false,
                    _ => cell.push(c),
                }
            } else {
                match c {
                    '"' => in_quotes = true,
                    ',' => row.push(std::mem::take(&mut cell)),
                    '\n' => {
                        row.push(std::mem::take(&mut cell));
                        rows.push(std::mem::take(&mut row));
                    }
                    _ => cell.push(c),
                }
            }
        }
        rows
    }

    #[test]
    fn test_compute_columns_sorted_union() {
        let records = vec![
            record(1, "a.png", &[("name", Some("Acme")), ("date", None)]),
            record(2, "b.png", &[("address", Some("Tokyo")), ("name", Some("Beta"))]),
        ];
        assert_eq!(compute_columns(&records), vec!["address", "date", "name"]);
    }

    #[test]
    fn test_compute_columns_order_independent() {
        let a = record(1, "a.png", &[("z", Some("1")), ("m", None)]);
        let b = record(2, "b.png", &[("a", Some("2"))]);
        let c = record(3, "c.png", &[]);

        let forward = compute_columns(&[a.clone(), b.clone(), c.clone()]);
        let backward = compute_columns(&[c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_compute_columns_idempotent() {
        let records = vec![record(1, "a.png", &[("b", Some("1")), ("a", None)])];
        assert_eq!(compute_columns(&records), compute_columns(&records));
    }

    #[test]
    fn test_compute_columns_empty() {
        assert!(compute_columns(&[]).is_empty());
    }

    #[test]
    fn test_to_csv_header_and_quoting() {
        let records = vec![record(10, "say \"hi\".png", &[("note", Some("a \"quoted\" word"))])];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,sourceName,note");
        assert_eq!(lines[1], r#"10,"say ""hi"".png","a ""quoted"" word""#);
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_to_csv_empty_records_header_only() {
        assert_eq!(to_csv(&[]), "id,sourceName\n");
    }

    #[test]
    fn test_missing_field_empty_in_csv_but_placeholder_in_table() {
        // 出力は空文字、表示は N/A（表示先ごとの意図的な違い）
        let records = vec![
            record(1, "a.png", &[("name", Some("Acme")), ("date", None)]),
            record(2, "b.png", &[("address", Some("Tokyo"))]),
        ];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,sourceName,address,date,name");
        assert_eq!(lines[1], r#"1,"a.png","","","Acme""#);
        assert_eq!(lines[2], r#"2,"b.png","Tokyo","","""#);

        assert_eq!(display_cell(&records[0], "date"), MISSING_PLACEHOLDER);
        assert_eq!(display_cell(&records[0], "address"), MISSING_PLACEHOLDER);
        assert_eq!(display_cell(&records[1], "address"), "Tokyo");
        assert_eq!(export_cell(&records[0], "address"), "");
    }

    #[test]
    fn test_to_csv_round_trip() {
        let records = vec![
            record(1, "官報 2024,04.png", &[("法人名・氏名", Some("株式会社\"テスト\"")), ("住所", None)]),
            record(2, "b.png", &[("記事本文（全角）", Some("一行目\n二行目")), ("住所", Some("東京都千代田区"))]),
        ];
        let csv = to_csv(&records);
        let rows = parse_csv(&csv);

        let header = &rows[0];
        assert_eq!(&header[..2], &["id".to_string(), "sourceName".to_string()]);
        assert_eq!(rows.len(), records.len() + 1);

        for (record, row) in records.iter().zip(rows.iter().skip(1)) {
            assert_eq!(row[0], record.id.to_string());
            assert_eq!(row[1], record.source_name);
            for (i, column) in header.iter().enumerate().skip(2) {
                assert_eq!(row[i], export_cell(record, column));
                if let Some(value) = record.field(column) {
                    assert_eq!(row[i], value);
                }
            }
        }
    }

    #[test]
    fn test_header_with_comma_is_quoted() {
        let records = vec![record(1, "a.png", &[("a,b", Some("x"))])];
        let csv = to_csv(&records);
        assert!(csv.starts_with("id,sourceName,\"a,b\"\n"));
        let rows = parse_csv(&csv);
        assert_eq!(rows[0][2], "a,b");
        assert_eq!(rows[1][2], "x");
    }
}
