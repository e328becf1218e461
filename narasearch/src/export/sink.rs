//! Export sink trait and file naming.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::core::Category;
use crate::errors::ExportError;
use crate::projection::Table;
use crate::utils::format_file_date;

/// Status line shown when an export fails.
pub const EXPORT_FAILED_STATUS: &str = "저장 실패";

/// File name part used when no keyword was entered.
pub const ALL_KEYWORDS_LABEL: &str = "통합";

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Where the file was written.
    pub path: PathBuf,
    /// Data rows written, excluding the header.
    pub rows: usize,
}

impl ExportReport {
    /// Returns the status line for this export.
    #[must_use]
    pub fn status(&self) -> String {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        format!("저장 완료: {name}")
    }
}

/// Writes an export table to a destination file.
///
/// Failures are returned to the caller, never swallowed.
pub trait ExportSink: Send + Sync {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Writes `table` to `destination`, replacing any existing file.
    ///
    /// An empty table is rejected with [`ExportError::NoData`].
    fn export(&self, table: &Table, destination: &Path) -> Result<ExportReport, ExportError>;
}

/// Writes the table as pretty-printed JSON (`{"columns": [...], "rows": [...]}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExportSink;

impl ExportSink for JsonExportSink {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn export(&self, table: &Table, destination: &Path) -> Result<ExportReport, ExportError> {
        if table.is_empty() {
            return Err(ExportError::NoData);
        }
        let mut writer = BufWriter::new(File::create(destination)?);
        serde_json::to_writer_pretty(&mut writer, table)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer.flush()?;
        info!(path = %destination.display(), rows = table.len(), "table exported as json");
        Ok(ExportReport {
            path: destination.to_path_buf(),
            rows: table.len(),
        })
    }
}

/// Returns `{category}_{keywords}_검색결과_{yyyyMMdd}`, without extension.
///
/// Blank keyword input is replaced with `통합`; characters that are not
/// allowed in file names become `_`.
#[must_use]
pub fn export_file_stem(category: Category, keyword_input: &str, date: NaiveDate) -> String {
    let keyword = keyword_input.trim();
    let keyword = if keyword.is_empty() {
        ALL_KEYWORDS_LABEL.to_string()
    } else {
        keyword
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!("{category}_{keyword}_검색결과_{}", format_file_date(date))
}

/// Returns the default CSV file name for an export.
///
/// ```
/// use chrono::NaiveDate;
/// use narasearch::core::Category;
/// use narasearch::export::default_export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
/// assert_eq!(
///     default_export_file_name(Category::BidNotice, "철도 축제", date),
///     "입찰공고_철도 축제_검색결과_20250321.csv"
/// );
/// ```
#[must_use]
pub fn default_export_file_name(category: Category, keyword_input: &str, date: NaiveDate) -> String {
    format!("{}.csv", export_file_stem(category, keyword_input, date))
}
