//! # Narasearch
//!
//! Search procurement notices published through the public procurement open API
//! (입찰공고 / 사전규격), consolidate every result page, narrow the records with
//! AND-combined keywords and project them into a display table and an export table.
//!
//! The crate provides:
//!
//! - **Page retrieval**: envelope classification, a page fetcher and a bounded paginator
//! - **Keyword filtering**: whitespace and case insensitive substring matching
//! - **Schema projection**: per-category column tables with currency formatting
//! - **Pipeline orchestration**: a single-use run state machine with classified failures
//! - **Collaborators**: export sinks and a settings store for keyword shortcuts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use narasearch::prelude::*;
//!
//! let pipeline = SearchPipeline::new(SearchConfig::default())?;
//! let request = SearchRequest::new(
//!     Category::BidNotice,
//!     "어린이, 철도",
//!     DateRange::last_weeks(3),
//!     service_key,
//! )?;
//!
//! match pipeline.run(&request).await {
//!     SearchOutcome::Succeeded(results) => println!("{}", results.status),
//!     SearchOutcome::Failed(failure) => eprintln!("{}", failure.detail),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod observability;
pub mod pipeline;
pub mod projection;
pub mod settings;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EndpointConfig, SearchConfig};
    pub use crate::core::{Category, PipelineState, RawRecord};
    pub use crate::errors::{ExportError, FailureKind, SearchError, SettingsError};
    pub use crate::export::{default_export_file_name, ExportSink};
    pub use crate::fetch::{
        AggregatedRecords, Classification, PageTransport, Paginator, RawResponse,
        ResultClassifier,
    };
    pub use crate::filter::{KeywordFilter, KeywordSet};
    pub use crate::observability::{LoggingSearchObserver, NoOpSearchObserver, SearchObserver};
    pub use crate::pipeline::{
        DateRange, SearchFailure, SearchLauncher, SearchOutcome, SearchPipeline,
        SearchRequest, SearchResults,
    };
    pub use crate::projection::{
        format_budget_amount, schema_for, Attachment, CategorySchema, DisplayTable,
        SchemaProjector, Table,
    };
    pub use crate::settings::{MemorySettingsStore, Settings, SettingsStore};

    #[cfg(feature = "csv-export")]
    pub use crate::export::CsvExportSink;
    pub use crate::fetch::HttpTransport;
    pub use crate::settings::JsonSettingsStore;
}
