//! The search pipeline: fetch, filter, project.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::outcome::{SearchFailure, SearchOutcome, SearchResults};
use super::request::SearchRequest;
use super::run::SearchRun;
use crate::config::SearchConfig;
use crate::core::PipelineState;
use crate::errors::SearchError;
use crate::fetch::{HttpTransport, PageFetcher, PageQuery, PageTransport, Paginator, ResultClassifier};
use crate::filter::KeywordFilter;
use crate::observability::{NoOpSearchObserver, SearchObserver};
use crate::projection::SchemaProjector;

/// Runs searches end to end.
///
/// A pipeline holds no per-run state; every call to [`run`](Self::run) owns
/// its records and produces fresh tables.
pub struct SearchPipeline {
    config: Arc<SearchConfig>,
    transport: Arc<dyn PageTransport>,
    observer: Arc<dyn SearchObserver>,
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchPipeline {
    /// Creates a pipeline backed by [`HttpTransport`].
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a pipeline over a custom transport.
    #[must_use]
    pub fn with_transport(config: SearchConfig, transport: Arc<dyn PageTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            observer: Arc::new(NoOpSearchObserver),
        }
    }

    /// Sets the run observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Executes one run to a terminal state.
    pub async fn run(&self, request: &SearchRequest) -> SearchOutcome {
        self.run_with(SearchRun::new(self.observer.clone()), request)
            .await
    }

    /// Executes one run on a tokio task.
    ///
    /// The returned [`SearchTask`] knows the run id up front and turns a
    /// panicked task into an [`Unexpected`](crate::errors::FailureKind::Unexpected)
    /// failure.
    #[must_use]
    pub fn spawn(self: &Arc<Self>, request: SearchRequest) -> SearchTask {
        self.spawn_holding(request, ())
    }

    /// Spawns a run that keeps `held` alive until the run is terminal.
    pub(crate) fn spawn_holding<H>(self: &Arc<Self>, request: SearchRequest, held: H) -> SearchTask
    where
        H: Send + 'static,
    {
        let run = SearchRun::new(self.observer.clone());
        let run_id = run.run_id();
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let outcome = pipeline.run_with(run, &request).await;
            drop(held);
            outcome
        });
        SearchTask { run_id, handle }
    }

    async fn run_with(&self, mut run: SearchRun, request: &SearchRequest) -> SearchOutcome {
        let span = info_span!("search_run", run_id = %run.id(), category = %request.category);
        async {
            self.observer.on_run_start(
                run.id(),
                request.category.label(),
                request.keywords.as_slice(),
            );
            if request.range.exceeds_max_span() {
                warn!(
                    start = %request.range.start,
                    end = %request.range.end,
                    "search window is longer than the API accepts"
                );
            }

            let outcome = match self.execute(&mut run, request).await {
                Ok(results) => SearchOutcome::Succeeded(results),
                Err(error) => {
                    run.fail(&error);
                    SearchOutcome::Failed(SearchFailure::from_error(run.run_id(), &error))
                }
            };

            let rows = match &outcome {
                SearchOutcome::Succeeded(results) => results.matched,
                SearchOutcome::Failed(_) => 0,
            };
            run.complete(rows);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        run: &mut SearchRun,
        request: &SearchRequest,
    ) -> Result<SearchResults, SearchError> {
        request.validate()?;
        run.advance(PipelineState::Fetching)?;
        let fetcher = PageFetcher::new(
            Arc::clone(&self.transport),
            PageQuery::from_request(request, &self.config),
            ResultClassifier::from_config(&self.config),
        );
        let aggregated = Paginator::new(fetcher, self.config.max_pages)
            .with_observer(Arc::clone(&self.observer))
            .collect(run.id())
            .await?;
        let fetched = aggregated.len();
        let pages_fetched = aggregated.pages_fetched;

        run.advance(PipelineState::Filtering)?;
        let filter = KeywordFilter::new(request.category.title_field(), request.keywords.clone());
        let matched = filter.apply(aggregated.records)?;

        run.advance(PipelineState::Projecting)?;
        let projection = SchemaProjector::new(request.category).project(&matched);

        run.advance(PipelineState::Succeeded)?;
        info!(fetched, matched = matched.len(), pages_fetched, "search succeeded");

        Ok(SearchResults {
            run_id: run.run_id(),
            category: request.category,
            display: projection.display,
            export: projection.export,
            status: SearchResults::status_line(request.category, matched.len()),
            fetched,
            matched: matched.len(),
            pages_fetched,
        })
    }
}

/// A run executing on a tokio task.
#[derive(Debug)]
pub struct SearchTask {
    run_id: Uuid,
    handle: JoinHandle<SearchOutcome>,
}

impl SearchTask {
    /// Returns the run id.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns true once the run has reached a terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the outcome.
    pub async fn join(self) -> SearchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let error = SearchError::from(join_error);
                SearchOutcome::Failed(SearchFailure::from_error(self.run_id, &error))
            }
        }
    }
}
