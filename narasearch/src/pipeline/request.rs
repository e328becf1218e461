//! Validated search requests.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::core::Category;
use crate::errors::{
    SearchError, EMPTY_KEYWORD_MESSAGE, MISSING_CREDENTIAL_MESSAGE, REVERSED_RANGE_MESSAGE,
};
use crate::filter::KeywordSet;
use crate::utils::{format_query_timestamp, now_local_minute};

/// Longest search window the API accepts, in days.
pub const MAX_SPAN_DAYS: i64 = 31;

/// Default search window used by callers that do not pick one, in weeks.
pub const DEFAULT_WEEKS: u32 = 3;

/// An inclusive search window at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Window start.
    pub start: NaiveDateTime,
    /// Window end.
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Creates a window.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns the window ending now and starting `weeks` weeks earlier.
    #[must_use]
    pub fn last_weeks(weeks: u32) -> Self {
        let end = now_local_minute();
        Self::new(end - TimeDelta::weeks(i64::from(weeks)), end)
    }

    /// Returns the start as a `yyyyMMddHHmm` query value.
    #[must_use]
    pub fn start_param(&self) -> String {
        format_query_timestamp(self.start)
    }

    /// Returns the end as a `yyyyMMddHHmm` query value.
    #[must_use]
    pub fn end_param(&self) -> String {
        format_query_timestamp(self.end)
    }

    /// Returns the window length.
    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns true if the start is after the end.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Returns true if the window is longer than the API allows.
    ///
    /// Requests are not rejected locally for this; the server answers with a
    /// range-exceeded result code, which the pipeline surfaces.
    #[must_use]
    pub fn exceeds_max_span(&self) -> bool {
        self.span() > TimeDelta::days(MAX_SPAN_DAYS)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::last_weeks(DEFAULT_WEEKS)
    }
}

/// A search request that passed input validation.
///
/// Deserialized requests go through the same checks as [`SearchRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRequest")]
pub struct SearchRequest {
    /// Notice category.
    pub category: Category,
    /// Primary keyword followed by refinements.
    pub keywords: KeywordSet,
    /// Search window.
    pub range: DateRange,
    /// Portal service key, already percent-encoded.
    pub service_key: String,
}

impl SearchRequest {
    /// Builds a request from raw keyword input.
    ///
    /// Input is split on commas and whitespace. Empty keyword input, a blank
    /// service key and a reversed window are rejected as
    /// [`SearchError::InputInvalid`], in that order.
    pub fn new(
        category: Category,
        keyword_input: &str,
        range: DateRange,
        service_key: impl Into<String>,
    ) -> Result<Self, SearchError> {
        Self::from_keywords(category, KeywordSet::parse(keyword_input)?, range, service_key)
    }

    /// Builds a request from an already tokenized keyword set.
    pub fn from_keywords(
        category: Category,
        keywords: KeywordSet,
        range: DateRange,
        service_key: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let request = Self {
            category,
            keywords,
            range,
            service_key: service_key.into().trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Checks the request the way [`SearchRequest::new`] does.
    ///
    /// The fields are public, so a request assembled by hand may not have
    /// been checked; the pipeline calls this before any network access.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.keywords.is_empty() {
            return Err(SearchError::input_invalid(EMPTY_KEYWORD_MESSAGE));
        }
        if self.service_key.trim().is_empty() {
            return Err(SearchError::input_invalid(MISSING_CREDENTIAL_MESSAGE));
        }
        if self.range.is_reversed() {
            return Err(SearchError::input_invalid(REVERSED_RANGE_MESSAGE));
        }
        Ok(())
    }

    /// Returns the status line shown while the run is in progress.
    #[must_use]
    pub fn pending_status(&self) -> String {
        format!(
            "[{}] '{}' 검색 중입니다... (데이터량에 따라 시간이 걸릴 수 있습니다)",
            self.category,
            self.keywords.as_slice().join(" ")
        )
    }
}

#[derive(Deserialize)]
struct UncheckedRequest {
    category: Category,
    keywords: KeywordSet,
    range: DateRange,
    service_key: String,
}

impl TryFrom<UncheckedRequest> for SearchRequest {
    type Error = SearchError;

    fn try_from(raw: UncheckedRequest) -> Result<Self, Self::Error> {
        Self::from_keywords(raw.category, raw.keywords, raw.range, raw.service_key)
    }
}
