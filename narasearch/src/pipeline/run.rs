//! The per-run state machine.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::core::PipelineState;
use crate::errors::SearchError;
use crate::observability::{RunTimer, SearchObserver};

/// A single-use search run.
///
/// Every transition is checked with [`PipelineState::can_transition_to`] and
/// reported to the observer. Once terminal, the run accepts no further
/// transitions.
pub struct SearchRun {
    run_id: Uuid,
    id: String,
    state: PipelineState,
    observer: Arc<dyn SearchObserver>,
    timer: RunTimer,
}

impl std::fmt::Debug for SearchRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRun")
            .field("run_id", &self.run_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SearchRun {
    /// Creates an idle run with a fresh id.
    #[must_use]
    pub fn new(observer: Arc<dyn SearchObserver>) -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            id: run_id.to_string(),
            state: PipelineState::Idle,
            observer,
            timer: RunTimer::start(),
        }
    }

    /// Returns the run id.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the run id as text.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the time since the run was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.timer.elapsed_ms()
    }

    /// Moves to `next`, rejecting illegal transitions.
    pub fn advance(&mut self, next: PipelineState) -> Result<(), SearchError> {
        if !self.state.can_transition_to(next) {
            return Err(SearchError::unexpected(format!(
                "illegal run transition {} -> {next}",
                self.state
            )));
        }
        self.observer.on_state_change(&self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Marks the run failed with the error's classification.
    ///
    /// A run that is already terminal keeps its state.
    pub fn fail(&mut self, error: &SearchError) {
        let next = PipelineState::Failed(error.kind());
        if self.advance(next).is_err() {
            warn!(run_id = %self.id, state = %self.state, "failure reported on a finished run");
        }
    }

    /// Reports completion to the observer.
    pub fn complete(&self, rows: usize) {
        self.observer
            .on_run_complete(&self.id, self.state, rows, self.elapsed_ms());
    }
}
