//! Search orchestration.
//!
//! This module provides:
//! - Validated [`SearchRequest`]s and their [`DateRange`]
//! - The per-run state machine ([`SearchRun`])
//! - [`SearchPipeline`], which fetches, filters and projects in one run
//! - [`SearchLauncher`], which keeps callers from starting overlapping runs

mod launcher;
mod outcome;
mod request;
mod run;
mod runner;

#[cfg(test)]
mod integration_tests;

pub use launcher::SearchLauncher;
pub use outcome::{SearchFailure, SearchOutcome, SearchResults, FAILURE_STATUS};
pub use request::{DateRange, SearchRequest, DEFAULT_WEEKS, MAX_SPAN_DAYS};
pub use run::SearchRun;
pub use runner::{SearchPipeline, SearchTask};
