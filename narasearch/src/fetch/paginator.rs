//! Sequential multi-page aggregation.

use std::sync::Arc;
use tracing::{debug, info};

use super::fetcher::{PageFetcher, PageStep, StopReason};
use crate::core::RawRecord;
use crate::errors::SearchError;
use crate::observability::{NoOpSearchObserver, SearchObserver};

/// Records collected across every fetched page, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedRecords {
    /// The records, in page order then API order.
    pub records: Vec<RawRecord>,
    /// How many pages were requested.
    pub pages_fetched: u32,
    /// The last total reported by the server.
    pub reported_total: u64,
    /// Why pagination stopped.
    pub stop_reason: Option<StopReason>,
}

impl AggregatedRecords {
    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Drives a [`PageFetcher`] from page 1 until a stop condition.
///
/// Pages are fetched strictly one after another and never re-fetched.
pub struct Paginator {
    fetcher: PageFetcher,
    max_pages: u32,
    observer: Arc<dyn SearchObserver>,
}

impl Paginator {
    /// Creates a paginator with the given page ceiling.
    #[must_use]
    pub fn new(fetcher: PageFetcher, max_pages: u32) -> Self {
        Self {
            fetcher,
            max_pages,
            observer: Arc::new(NoOpSearchObserver),
        }
    }

    /// Sets the observer notified after every page.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetches pages and accumulates their records.
    ///
    /// Any fatal page aborts the whole collection; partial records are dropped.
    /// Returns [`SearchError::NoResults`] if nothing was collected.
    pub async fn collect(&self, run_id: &str) -> Result<AggregatedRecords, SearchError> {
        let mut aggregated = AggregatedRecords::default();

        for page_no in 1..=self.max_pages {
            let page = self.fetcher.fetch(page_no, aggregated.len()).await?;
            aggregated.pages_fetched = page_no;

            let page_items = page.response.items.len();
            if page.step != PageStep::Stop(StopReason::EmptyEnvelope) {
                aggregated.reported_total = page.response.total_count;
            }
            aggregated.records.extend(page.response.items);

            self.observer.on_page_fetched(
                run_id,
                page_no,
                page_items,
                aggregated.len(),
                aggregated.reported_total,
            );

            if let PageStep::Stop(reason) = page.step {
                aggregated.stop_reason = Some(reason);
                break;
            }
            if page_no == self.max_pages {
                debug!(page_no, "page ceiling reached");
                aggregated.stop_reason = Some(StopReason::PageCeiling);
            }
        }

        info!(
            run_id,
            pages = aggregated.pages_fetched,
            records = aggregated.len(),
            reported_total = aggregated.reported_total,
            stop_reason = ?aggregated.stop_reason,
            "pagination finished"
        );

        if aggregated.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(aggregated)
    }
}
