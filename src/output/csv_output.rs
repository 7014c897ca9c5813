//! CSV output

use crate::output::replace_file;
use crate::output::traits::{ExportRow, OutputResult, SpreadsheetWriter, HEADERS};
use std::path::Path;

/// Writes rows as comma-separated text with a header line
#[derive(Debug, Clone, Default)]
pub struct CsvWriter;

impl SpreadsheetWriter for CsvWriter {
    fn write(&self, rows: &[ExportRow], path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(HEADERS)?;
        for row in rows {
            writer.write_record(row.cells())?;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        replace_file(path, &bytes)
    }

    fn format_name(&self) -> &'static str {
        "csv"
    }
}
