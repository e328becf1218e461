//! Single-page fetching.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::classifier::{Classification, ResultClassifier};
use super::transport::PageTransport;
use crate::config::SearchConfig;
use crate::core::RawRecord;
use crate::errors::SearchError;
use crate::pipeline::SearchRequest;

/// Fixed query parameters shared by every page of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    endpoint: String,
    keyword_param: &'static str,
    primary_keyword: String,
    start: String,
    end: String,
    service_key: String,
    page_size: u32,
}

impl PageQuery {
    /// Builds the fixed parameters for a request.
    #[must_use]
    pub fn from_request(request: &SearchRequest, config: &SearchConfig) -> Self {
        Self {
            endpoint: config.endpoints.for_category(request.category).to_string(),
            keyword_param: request.category.title_field(),
            primary_keyword: request.keywords.primary().unwrap_or_default().to_string(),
            start: request.range.start_param(),
            end: request.range.end_param(),
            service_key: request.service_key.clone(),
            page_size: config.page_size,
        }
    }

    /// Returns the configured rows per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Builds the URL for a 1-based page number.
    ///
    /// The service key is appended verbatim: portal keys are issued already
    /// percent-encoded and must not be encoded twice.
    pub fn url(&self, page_no: u32) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            SearchError::unexpected(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        url.query_pairs_mut()
            .append_pair("inqryDiv", "1")
            .append_pair("inqryBgnDt", &self.start)
            .append_pair("inqryEndDt", &self.end)
            .append_pair(self.keyword_param, &self.primary_keyword)
            .append_pair("type", "json")
            .append_pair("pageNo", &page_no.to_string())
            .append_pair("numOfRows", &self.page_size.to_string());
        let query = format!(
            "{}&serviceKey={}",
            url.query().unwrap_or_default(),
            self.service_key
        );
        url.set_query(Some(&query));
        Ok(url)
    }
}

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The envelope had no body.
    EmptyEnvelope,
    /// The page carried no items.
    EmptyPage,
    /// The accumulated count reached the reported total.
    TotalReached,
    /// The page ceiling was reached.
    PageCeiling,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEnvelope => write!(f, "empty_envelope"),
            Self::EmptyPage => write!(f, "empty_page"),
            Self::TotalReached => write!(f, "total_reached"),
            Self::PageCeiling => write!(f, "page_ceiling"),
        }
    }
}

/// Whether another page should be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// Request the next page.
    Continue,
    /// Stop paginating.
    Stop(StopReason),
}

/// The decoded content of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    /// The result code, if any.
    pub result_code: Option<String>,
    /// The total the server reports for the whole search.
    pub total_count: u64,
    /// The records on this page.
    pub items: Vec<RawRecord>,
}

/// One fetched page and the pagination decision it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// The 1-based page number.
    pub page_no: u32,
    /// The page content.
    pub response: PageResponse,
    /// Whether more pages remain.
    pub step: PageStep,
}

/// Fetches and classifies individual pages.
pub struct PageFetcher {
    transport: Arc<dyn PageTransport>,
    query: PageQuery,
    classifier: ResultClassifier,
}

impl PageFetcher {
    /// Creates a new page fetcher.
    #[must_use]
    pub fn new(transport: Arc<dyn PageTransport>, query: PageQuery, classifier: ResultClassifier) -> Self {
        Self {
            transport,
            query,
            classifier,
        }
    }

    /// Fetches one page.
    ///
    /// `accumulated` is the number of records collected before this page.
    /// Transport, parse and range failures are returned as errors.
    pub async fn fetch(&self, page_no: u32, accumulated: usize) -> Result<FetchedPage, SearchError> {
        let url = self.query.url(page_no)?;
        debug!(page_no, "requesting page");
        let raw = self.transport.get(&url).await?;

        let (response, step) = match self.classifier.classify(&raw) {
            Classification::TransportFailure { status } => {
                return Err(SearchError::Transport { status });
            }
            Classification::ParseFailure { preview } => {
                return Err(SearchError::Parse { preview });
            }
            Classification::RangeExceeded => return Err(SearchError::RangeExceeded),
            Classification::EmptyEnvelope => (
                PageResponse::default(),
                PageStep::Stop(StopReason::EmptyEnvelope),
            ),
            Classification::Success {
                result_code,
                items,
                total_count,
            } => {
                if items.len() > self.query.page_size() as usize {
                    warn!(
                        page_no,
                        items = items.len(),
                        page_size = self.query.page_size(),
                        "page returned more rows than requested"
                    );
                }
                let step = if items.is_empty() {
                    PageStep::Stop(StopReason::EmptyPage)
                } else if (accumulated + items.len()) as u64 >= total_count {
                    PageStep::Stop(StopReason::TotalReached)
                } else {
                    PageStep::Continue
                };
                (
                    PageResponse {
                        result_code,
                        total_count,
                        items,
                    },
                    step,
                )
            }
        };

        Ok(FetchedPage {
            page_no,
            response,
            step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Category;
    use crate::fetch::transport::{MockPageTransport, RawResponse};
    use crate::pipeline::DateRange;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn request() -> SearchRequest {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap().and_hms_opt(23, 50, 0).unwrap();
        SearchRequest::new(
            Category::BidNotice,
            "어린이 철도",
            DateRange::new(start, end),
            "abc%2Bdef%3D%3D",
        )
        .unwrap()
    }

    fn query() -> PageQuery {
        PageQuery::from_request(&request(), &SearchConfig::default())
    }

    #[test]
    fn test_url_carries_fixed_parameters() {
        let url = query().url(2).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("inqryDiv".to_string(), "1".to_string())));
        assert!(pairs.contains(&("inqryBgnDt".to_string(), "202503010000".to_string())));
        assert!(pairs.contains(&("inqryEndDt".to_string(), "202503212350".to_string())));
        assert!(pairs.contains(&("bidNtceNm".to_string(), "어린이".to_string())));
        assert!(pairs.contains(&("type".to_string(), "json".to_string())));
        assert!(pairs.contains(&("pageNo".to_string(), "2".to_string())));
        assert!(pairs.contains(&("numOfRows".to_string(), "999".to_string())));
    }

    #[test]
    fn test_service_key_is_not_reencoded() {
        let url = query().url(1).unwrap();
        assert!(url.as_str().ends_with("&serviceKey=abc%2Bdef%3D%3D"));
    }

    fn fetcher_with(response: RawResponse) -> PageFetcher {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(move |_| Ok(response.clone()));
        PageFetcher::new(Arc::new(transport), query(), ResultClassifier::default())
    }

    #[tokio::test]
    async fn test_fetch_continues_below_total() {
        let fetcher = fetcher_with(RawResponse::ok(
            r#"{"response":{"body":{"items":[{"bidNtceNm":"a"}],"totalCount":5}}}"#,
        ));
        let page = fetcher.fetch(1, 0).await.unwrap();
        assert_eq!(page.step, PageStep::Continue);
        assert_eq!(page.response.total_count, 5);
        assert_eq!(page.response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_stops_at_total() {
        let fetcher = fetcher_with(RawResponse::ok(
            r#"{"response":{"body":{"items":[{"bidNtceNm":"a"}],"totalCount":5}}}"#,
        ));
        let page = fetcher.fetch(2, 4).await.unwrap();
        assert_eq!(page.step, PageStep::Stop(StopReason::TotalReached));
    }

    #[tokio::test]
    async fn test_fetch_stops_on_empty_page_and_envelope() {
        let fetcher = fetcher_with(RawResponse::ok(
            r#"{"response":{"body":{"items":[],"totalCount":5}}}"#,
        ));
        assert_eq!(
            fetcher.fetch(1, 0).await.unwrap().step,
            PageStep::Stop(StopReason::EmptyPage)
        );

        let fetcher = fetcher_with(RawResponse::ok(r#"{"response":{"header":{"resultCode":"00"}}}"#));
        assert_eq!(
            fetcher.fetch(1, 0).await.unwrap().step,
            PageStep::Stop(StopReason::EmptyEnvelope)
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_fatal_classifications() {
        let err = fetcher_with(RawResponse::new(500, "")).fetch(1, 0).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport { status: 500 }));

        let err = fetcher_with(RawResponse::ok("<xml/>")).fetch(1, 0).await.unwrap_err();
        assert!(matches!(err, SearchError::Parse { ref preview } if preview == "<xml/>"));

        let err = fetcher_with(RawResponse::ok(r#"{"resultCode":"07"}"#))
            .fetch(1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::RangeExceeded));
    }
}
