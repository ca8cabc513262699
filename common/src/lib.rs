//! Image Extract Common Library
//!
//! CLIと外部ツールで共有される型・レスポンスパーサー・表変換

pub mod error;
pub mod export;
pub mod parser;
pub mod prompts;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use parser::{extract_json_block, parse_fields};
pub use prompts::{DEFAULT_PROMPT, EXTRACTION_INSTRUCTION};
pub use table::{compute_columns, display_cell, export_cell, to_csv, MISSING_PLACEHOLDER};
pub use types::{ExtractionRecord, FieldMap};
