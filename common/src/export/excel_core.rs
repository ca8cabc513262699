//! Excel生成（共通ライブラリ）
//!
//! CSVと同じヘッダー・行構成で1シートのブックを生成する

use crate::error::{Error, Result};
use crate::table::{compute_columns, export_cell, header_row};
use crate::types::ExtractionRecord;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// シート名
pub const SHEET_NAME: &str = "extracted_data";

/// 列幅の上限（文字数）
const MAX_COL_WIDTH: usize = 60;

fn xlsx_err(e: XlsxError) -> Error {
    Error::Export(e.to_string())
}

fn col_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| Error::Export(format!("列数が多すぎます: {}", col)))
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| Error::Export(format!("行数が多すぎます: {}", row)))
}

/// Excelをバッファに生成
///
/// 欠落・nullフィールドは空セルのまま残す。
pub fn generate_xlsx_buffer(records: &[ExtractionRecord]) -> Result<Vec<u8>> {
    let columns = compute_columns(records);
    let headers = header_row(&columns);

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_index(col)?, header, &header_format)
            .map_err(xlsx_err)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = row_index(i + 1)?;
        let id = record.id.to_string();
        let cells = [id.as_str(), record.source_name.as_str()]
            .into_iter()
            .chain(columns.iter().map(|c| export_cell(record, c)));

        for (col, value) in cells.enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row, col_index(col)?, value)
                .map_err(xlsx_err)?;
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet
            .set_column_width(col_index(col)?, (*width).min(MAX_COL_WIDTH) as f64 + 2.0)
            .map_err(xlsx_err)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;

    workbook.save_to_buffer().map_err(xlsx_err)
}
