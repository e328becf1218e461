//! Configuration types for searching and fetching.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::Category;
use crate::errors::SettingsError;

/// Base endpoints per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Bid notice list endpoint.
    #[serde(default = "default_bid_notice_endpoint")]
    pub bid_notice: String,
    /// Pre-specification list endpoint.
    #[serde(default = "default_pre_spec_endpoint")]
    pub pre_spec: String,
}

fn default_bid_notice_endpoint() -> String {
    "http://apis.data.go.kr/1230000/ad/BidPublicInfoService/getBidPblancListInfoServcPPSSrch"
        .to_string()
}

fn default_pre_spec_endpoint() -> String {
    "http://apis.data.go.kr/1230000/ao/HrcspSsstndrdInfoService/getPublicPrcureThngInfoServcPPSSrch"
        .to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            bid_notice: default_bid_notice_endpoint(),
            pre_spec: default_pre_spec_endpoint(),
        }
    }
}

impl EndpointConfig {
    /// Points both categories at the same host, keeping each service path.
    ///
    /// Used to redirect traffic to a proxy or a local test server.
    #[must_use]
    pub fn with_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            bid_notice: format!(
                "{host}/1230000/ad/BidPublicInfoService/getBidPblancListInfoServcPPSSrch"
            ),
            pre_spec: format!(
                "{host}/1230000/ao/HrcspSsstndrdInfoService/getPublicPrcureThngInfoServcPPSSrch"
            ),
        }
    }

    /// Returns the endpoint for a category.
    #[must_use]
    pub fn for_category(&self, category: Category) -> &str {
        match category {
            Category::BidNotice => &self.bid_notice,
            Category::PreSpec => &self.pre_spec,
        }
    }
}

/// Configuration for a search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base endpoints.
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Rows requested per page (the API maximum).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Hard ceiling on pages fetched per run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Result code the server uses for "search window too long".
    #[serde(default = "default_range_exceeded_code")]
    pub range_exceeded_code: String,
    /// Result code the server uses for success.
    #[serde(default = "default_success_code")]
    pub success_code: String,
    /// Characters of an undecodable payload kept for diagnostics.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Per-request timeout in seconds; `None` leaves the client default.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_page_size() -> u32 {
    999
}

fn default_max_pages() -> u32 {
    20
}

fn default_range_exceeded_code() -> String {
    "07".to_string()
}

fn default_success_code() -> String {
    "00".to_string()
}

fn default_preview_chars() -> usize {
    300
}

fn default_user_agent() -> String {
    "narasearch/0.1".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            range_exceeded_code: default_range_exceeded_code(),
            success_code: default_success_code(),
            preview_chars: default_preview_chars(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl SearchConfig {
    /// Creates a new search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file; absent keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sets the endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointConfig) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the page ceiling.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64)
    }
}
