//! Excel workbook output

use crate::output::replace_file;
use crate::output::traits::{ExportRow, OutputResult, SpreadsheetWriter, HEADERS};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Writes rows to a single-sheet `.xlsx` workbook
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, rows: &[ExportRow], path: &Path) -> OutputResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, value) in row.cells().iter().enumerate() {
                worksheet.write_string(row_num, col as u16, *value)?;
            }
        }

        let bytes = workbook.save_to_buffer()?;
        replace_file(path, &bytes)
    }

    fn format_name(&self) -> &'static str {
        "xlsx"
    }
}
