pub mod csv;
pub mod excel;

use crate::error::Result;
use clap::ValueEnum;
use image_extract_common::ExtractionRecord;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 出力ファイル名（拡張子なし）
pub const DEFAULT_FILE_STEM: &str = "extracted_data";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    #[value(alias = "excel")]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// 出力するデータがない（ファイルは作らない）
    NoData,
}

/// 出力先の決定
///
/// - 未指定・ディレクトリ・拡張子なし → `extracted_data.<ext>` を付ける
/// - 形式と違う拡張子 → 形式の拡張子に置き換える
pub fn output_path_for_format(output: Option<&Path>, format: ExportFormat) -> PathBuf {
    let file_name = format!("{}.{}", DEFAULT_FILE_STEM, format.extension());
    match output {
        None => PathBuf::from(file_name),
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => match path.extension() {
            None => path.join(file_name),
            Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case(format.extension()) => {
                path.to_path_buf()
            }
            Some(ext) => {
                warn!(
                    "出力形式と拡張子が一致しないため .{} に置き換えます: {}",
                    format.extension(),
                    ext.to_string_lossy()
                );
                path.with_extension(format.extension())
            }
        },
    }
}

pub fn export_records(
    records: &[ExtractionRecord],
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        return Ok(ExportOutcome::NoData);
    }

    let path = output_path_for_format(output, format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Csv => csv::write_csv(records, &path)?,
        ExportFormat::Xlsx => excel::write_xlsx(records, &path)?,
    }

    Ok(ExportOutcome::Written {
        path,
        rows: records.len(),
    })
}
