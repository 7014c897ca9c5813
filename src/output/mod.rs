//! Output module for exporting scraped prices
//!
//! This module handles:
//! - Turning product records into spreadsheet rows with the constant columns
//! - Writing the rows as `.xlsx` or `.csv`, chosen by file extension
//! - Recording and printing run statistics

mod csv_output;
pub mod stats;
mod traits;
mod xlsx;

pub use csv_output::CsvWriter;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{
    build_rows, ExportRow, OutputError, OutputResult, RowMetadata, SpreadsheetWriter, HEADERS,
};
pub use xlsx::XlsxWriter;

use crate::config::ExportConfig;
use crate::crawler::ProductRecord;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Picks a writer from the output file extension
pub fn writer_for_path(path: &Path, sheet_name: &str) -> OutputResult<Box<dyn SpreadsheetWriter>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("xlsx") => Ok(Box::new(XlsxWriter::new(sheet_name))),
        Some("csv") => Ok(Box::new(CsvWriter)),
        _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Writes all records to the configured export file
///
/// The file is replaced as a whole. Returns the number of data rows written.
pub fn export_records(records: &[ProductRecord], config: &ExportConfig) -> OutputResult<usize> {
    let path = Path::new(&config.path);
    let writer = writer_for_path(path, &config.sheet_name)?;
    let rows = build_rows(records, &RowMetadata::from(config));

    tracing::info!(
        "Writing {} rows to {} ({})",
        rows.len(),
        path.display(),
        writer.format_name()
    );
    writer.write(&rows, path)?;

    Ok(rows.len())
}

/// Replaces `path` with `bytes` in one step
///
/// The content is staged in a temporary file next to the target and renamed
/// over it, so readers never see a half-written export. The staging file is
/// removed when any step fails.
pub(crate) fn replace_file(path: &Path, bytes: &[u8]) -> OutputResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    Ok(())
}
