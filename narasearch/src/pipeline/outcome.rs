//! What a finished run hands back to its caller.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{Category, PipelineState};
use crate::errors::{FailureKind, SearchError};
use crate::projection::{DisplayTable, Table};

/// Coarse status line for every failed run.
pub const FAILURE_STATUS: &str = "검색 결과가 없습니다.";

/// The tables and summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Run id.
    pub run_id: Uuid,
    /// Searched category.
    pub category: Category,
    /// On-screen table.
    pub display: DisplayTable,
    /// Export table.
    pub export: Table,
    /// Status line summarizing the row count.
    pub status: String,
    /// Records aggregated across all pages.
    pub fetched: usize,
    /// Records left after keyword filtering.
    pub matched: usize,
    /// Pages requested.
    pub pages_fetched: u32,
}

impl SearchResults {
    /// Builds the success status line.
    #[must_use]
    pub fn status_line(category: Category, rows: usize) -> String {
        format!("[{category}] 검색 완료: {rows}건이 검색되었습니다.")
    }
}

/// A classified failure of a run.
///
/// `detail` is the full message meant for a dialog; `status` is the coarser
/// status-bar line, identical for every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{detail}")]
pub struct SearchFailure {
    /// Run id.
    pub run_id: Uuid,
    /// Classification.
    pub kind: FailureKind,
    /// User-facing detail message.
    pub detail: String,
    /// Status line.
    pub status: String,
}

impl SearchFailure {
    /// Builds a failure from a pipeline error.
    #[must_use]
    pub fn from_error(run_id: Uuid, error: &SearchError) -> Self {
        Self {
            run_id,
            kind: error.kind(),
            detail: error.to_string(),
            status: FAILURE_STATUS.to_string(),
        }
    }

    /// Returns true if the detail deserves a dialog on top of the status line.
    ///
    /// An empty result is already fully described by the status line.
    #[must_use]
    pub fn shows_dialog(&self) -> bool {
        self.kind != FailureKind::NoResults
    }
}

/// The terminal result of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Both tables were produced.
    Succeeded(SearchResults),
    /// The run failed.
    Failed(SearchFailure),
}

impl SearchOutcome {
    /// Returns true on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns the run id.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        match self {
            Self::Succeeded(results) => results.run_id,
            Self::Failed(failure) => failure.run_id,
        }
    }

    /// Returns the terminal state.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        match self {
            Self::Succeeded(_) => PipelineState::Succeeded,
            Self::Failed(failure) => PipelineState::Failed(failure.kind),
        }
    }

    /// Returns the status line.
    #[must_use]
    pub fn status(&self) -> &str {
        match self {
            Self::Succeeded(results) => &results.status,
            Self::Failed(failure) => &failure.status,
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<SearchResults, SearchFailure> {
        match self {
            Self::Succeeded(results) => Ok(results),
            Self::Failed(failure) => Err(failure),
        }
    }
}
