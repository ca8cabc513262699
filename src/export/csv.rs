//! CSV出力（UTF-8）

use crate::error::Result;
use image_extract_common::{to_csv, ExtractionRecord};
use std::path::Path;

pub fn write_csv(records: &[ExtractionRecord], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, to_csv(records))?;
    Ok(())
}
