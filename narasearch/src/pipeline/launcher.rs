//! Caller-side guard against overlapping runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::request::SearchRequest;
use super::runner::{SearchPipeline, SearchTask};

/// Starts runs in the background, one at a time.
///
/// A start while a run is outstanding is ignored. The launcher frees up again
/// as soon as that run reaches a terminal state, whether or not anyone awaits
/// its [`SearchTask`].
#[derive(Debug, Clone)]
pub struct SearchLauncher {
    pipeline: Arc<SearchPipeline>,
    busy: Arc<AtomicBool>,
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SearchLauncher {
    /// Creates a launcher over a shared pipeline.
    #[must_use]
    pub fn new(pipeline: Arc<SearchPipeline>) -> Self {
        Self {
            pipeline,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true while a run is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Starts a run unless one is already outstanding.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, request: SearchRequest) -> Option<SearchTask> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("search already running, start ignored");
            return None;
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        Some(self.pipeline.spawn_holding(request, guard))
    }
}
