//! Export sinks for the export table.

#[cfg(feature = "csv-export")]
mod csv_sink;
mod sink;

#[cfg(feature = "csv-export")]
pub use csv_sink::CsvExportSink;
pub use sink::{
    default_export_file_name, export_file_stem, ExportReport, ExportSink, JsonExportSink,
    ALL_KEYWORDS_LABEL, EXPORT_FAILED_STATUS,
};
