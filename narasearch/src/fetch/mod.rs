//! Page retrieval for the procurement API.
//!
//! This module provides:
//! - Envelope classification for the API's several response shapes
//! - A transport trait with a `reqwest` implementation
//! - A single-page fetcher that decides whether more pages remain
//! - A bounded, strictly sequential paginator

mod classifier;
mod fetcher;
mod paginator;
mod transport;

pub use classifier::{result_code, Classification, ResultClassifier, ResultCodeProbe, RESULT_CODE_PROBES};
pub use fetcher::{FetchedPage, PageFetcher, PageQuery, PageResponse, PageStep, StopReason};
pub use paginator::{AggregatedRecords, Paginator};
pub use transport::{HttpTransport, PageTransport, RawResponse};

#[cfg(test)]
pub(crate) use transport::MockPageTransport;
