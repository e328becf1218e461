//! CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::sink::{ExportReport, ExportSink};
use crate::errors::ExportError;
use crate::projection::Table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the export table as CSV: a header of column labels, then one line per row.
///
/// Output is UTF-8 with a byte order mark by default, so spreadsheet
/// applications detect the encoding of the Korean labels.
#[derive(Debug, Clone, Copy)]
pub struct CsvExportSink {
    bom: bool,
}

impl Default for CsvExportSink {
    fn default() -> Self {
        Self { bom: true }
    }
}

impl CsvExportSink {
    /// Creates a sink that writes a byte order mark.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to write a byte order mark.
    #[must_use]
    pub const fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

impl ExportSink for CsvExportSink {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn export(&self, table: &Table, destination: &Path) -> Result<ExportReport, ExportError> {
        if table.is_empty() {
            return Err(ExportError::NoData);
        }

        let mut file = BufWriter::new(File::create(destination)?);
        if self.bom {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(table.labels())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!(path = %destination.display(), rows = table.len(), "table exported as csv");
        Ok(ExportReport {
            path: destination.to_path_buf(),
            rows: table.len(),
        })
    }
}
