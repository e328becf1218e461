//! Transport seam for page requests.

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::config::SearchConfig;
use crate::errors::SearchError;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a new raw response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a 200 response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Whether the exchange was successful (2xx status).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Protocol for issuing a single GET request.
///
/// Implementations must not retry; the pipeline treats every failure as final.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Fetches a URL and returns its status and body.
    ///
    /// An error is returned only when no HTTP status was obtained at all.
    async fn get(&self, url: &Url) -> Result<RawResponse, SearchError>;
}

/// `reqwest`-backed transport.
///
/// Do not wrap `HttpTransport` in an [`std::sync::Arc`] for cloning purposes
/// because [`reqwest::Client`] uses an `Arc` internally.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport honoring the configured user agent and timeout.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, SearchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, body_len = body.len(), path = url.path(), "page response received");
        Ok(RawResponse { status, body })
    }
}
