//! Excel出力（CLI版）
//!
//! ブックの生成は共通ライブラリ側で行い、ここではファイルに書き出すだけ

use crate::error::{ImageExtractError, Result};
use image_extract_common::export::excel_core::generate_xlsx_buffer;
use image_extract_common::ExtractionRecord;
use std::path::Path;

pub fn write_xlsx(records: &[ExtractionRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_xlsx_buffer(records)
        .map_err(|e| ImageExtractError::ExcelGeneration(e.to_string()))?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
