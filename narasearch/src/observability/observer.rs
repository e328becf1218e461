//! Run observers.

use tracing::{error, info, Level};

use crate::core::PipelineState;

/// Observability callbacks for search runs.
pub trait SearchObserver: Send + Sync {
    /// Called when a run starts.
    fn on_run_start(&self, run_id: &str, category: &str, keywords: &[String]);

    /// Called after every fetched page.
    fn on_page_fetched(
        &self,
        run_id: &str,
        page_no: u32,
        page_items: usize,
        accumulated: usize,
        reported_total: u64,
    );

    /// Called on every state transition.
    fn on_state_change(&self, run_id: &str, from: PipelineState, to: PipelineState);

    /// Called when a run reaches a terminal state.
    fn on_run_complete(&self, run_id: &str, state: PipelineState, rows: usize, duration_ms: f64);
}

/// No-op implementation of [`SearchObserver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSearchObserver;

impl SearchObserver for NoOpSearchObserver {
    fn on_run_start(&self, _run_id: &str, _category: &str, _keywords: &[String]) {}
    fn on_page_fetched(&self, _run_id: &str, _page_no: u32, _page_items: usize, _accumulated: usize, _reported_total: u64) {}
    fn on_state_change(&self, _run_id: &str, _from: PipelineState, _to: PipelineState) {}
    fn on_run_complete(&self, _run_id: &str, _state: PipelineState, _rows: usize, _duration_ms: f64) {}
}

/// An observer that logs through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingSearchObserver {
    /// Level used for page and state events.
    level: Level,
}

impl Default for LoggingSearchObserver {
    fn default() -> Self {
        Self { level: Level::DEBUG }
    }
}

impl LoggingSearchObserver {
    /// Creates a new logging observer with the specified level for progress events.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates an info-level logging observer.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl SearchObserver for LoggingSearchObserver {
    fn on_run_start(&self, run_id: &str, category: &str, keywords: &[String]) {
        info!(run_id, category, ?keywords, "search started");
    }

    fn on_page_fetched(
        &self,
        run_id: &str,
        page_no: u32,
        page_items: usize,
        accumulated: usize,
        reported_total: u64,
    ) {
        if self.level == Level::INFO {
            info!(run_id, page_no, page_items, accumulated, reported_total, "page fetched");
        } else {
            tracing::debug!(run_id, page_no, page_items, accumulated, reported_total, "page fetched");
        }
    }

    fn on_state_change(&self, run_id: &str, from: PipelineState, to: PipelineState) {
        if self.level == Level::INFO {
            info!(run_id, %from, %to, "state changed");
        } else {
            tracing::debug!(run_id, %from, %to, "state changed");
        }
    }

    fn on_run_complete(&self, run_id: &str, state: PipelineState, rows: usize, duration_ms: f64) {
        match state {
            PipelineState::Failed(kind) => {
                error!(run_id, %kind, duration_ms, "search failed");
            }
            _ => info!(run_id, %state, rows, duration_ms, "search finished"),
        }
    }
}
