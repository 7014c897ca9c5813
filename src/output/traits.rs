//! Export handler traits and row types
//!
//! This module defines the trait interface for spreadsheet writers and the
//! rows they receive.

use crate::config::ExportConfig;
use crate::crawler::ProductRecord;
use std::path::Path;
use thiserror::Error;

/// Column headers in output order
pub const HEADERS: [&str; 7] = [
    "Код конкурента",
    "Конкурент",
    "Артикул",
    "Наименование",
    "Вид цены",
    "Цена",
    "Ссылка",
];

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Constant columns repeated on every row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMetadata {
    pub competitor_code: String,
    pub competitor_name: String,
    pub price_type: String,
}

impl From<&ExportConfig> for RowMetadata {
    fn from(config: &ExportConfig) -> Self {
        Self {
            competitor_code: config.competitor_code.clone(),
            competitor_name: config.competitor_name.clone(),
            price_type: config.price_type.clone(),
        }
    }
}

/// One spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub competitor_code: String,
    pub competitor_name: String,
    pub article: String,
    pub name: String,
    pub price_type: String,
    pub price: String,
    pub url: String,
}

impl ExportRow {
    /// Builds a row from a product record; missing fields become empty cells
    pub fn new(record: &ProductRecord, metadata: &RowMetadata) -> Self {
        Self {
            competitor_code: metadata.competitor_code.clone(),
            competitor_name: metadata.competitor_name.clone(),
            article: record.article.clone().unwrap_or_default(),
            name: record.name.clone().unwrap_or_default(),
            price_type: metadata.price_type.clone(),
            price: record.price.clone().unwrap_or_default(),
            url: record.url.clone(),
        }
    }

    /// Cell values in [`HEADERS`] order
    pub fn cells(&self) -> [&str; 7] {
        [
            self.competitor_code.as_str(),
            self.competitor_name.as_str(),
            self.article.as_str(),
            self.name.as_str(),
            self.price_type.as_str(),
            self.price.as_str(),
            self.url.as_str(),
        ]
    }
}

/// Builds one row per record
pub fn build_rows(records: &[ProductRecord], metadata: &RowMetadata) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| ExportRow::new(record, metadata))
        .collect()
}

/// Trait for spreadsheet writers
///
/// A writer replaces any existing file at `path` with a single sheet holding a
/// header row followed by `rows`.
pub trait SpreadsheetWriter {
    fn write(&self, rows: &[ExportRow], path: &Path) -> OutputResult<()>;

    /// Short format name used in log messages
    fn format_name(&self) -> &'static str;
}
