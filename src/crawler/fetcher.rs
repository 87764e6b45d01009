//! HTTP fetcher implementation
//!
//! This module defines the `Fetcher` capability the crawler depends on and the
//! default reqwest-backed implementation:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - Single-attempt GET requests (no retries)
//! - Redirects followed by the transport; the final URL is reported back
//! - Error classification into a typed `FetchOutcome`

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops the transport follows
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
///
/// Fetching never fails with an error; every fault is one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Non-2xx status code
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the timeout
        timed_out: bool,
    },
}

impl FetchOutcome {
    /// Returns true for `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::NetworkError { timed_out: true, .. })
    }

    /// Collapses the outcome into a `(content, ok)` pair
    pub fn into_content(self) -> (Option<String>, bool) {
        match self {
            Self::Success { body, .. } => (Some(body), true),
            _ => (None, false),
        }
    }

    /// Human-readable failure description, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::ContentMismatch { content_type } => {
                Some(format!("Expected HTML, got {}", content_type))
            }
            Self::NetworkError { error, .. } => Some(error.clone()),
        }
    }
}

/// Retrieves page content for the crawler
///
/// Implementations must never panic and must report every failure as a
/// `FetchOutcome` variant. The crawler is indifferent to which implementation
/// is injected.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` once
    async fn fetch(&self, url: &Url) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use program_scout::config::UserAgentConfig;
/// use program_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Plain HTTP GET fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already-configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with the configured user agent and timeout
    pub fn from_config(
        user_agent: &UserAgentConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, timeout)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL with a single GET request
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx with HTML (or missing) Content-Type | `Success` |
/// | 2xx with another Content-Type | `ContentMismatch` |
/// | Non-2xx after redirects | `HttpError` |
/// | Timeout | `NetworkError { timed_out: true }` |
/// | Connection / TLS / redirect / body errors | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchOutcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchOutcome::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(&e),
    }
}

/// Accepts HTML and XHTML, and responses that omit the header entirely
fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}

fn classify_error(e: &reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        FetchOutcome::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchOutcome::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else if e.is_redirect() {
        FetchOutcome::NetworkError {
            error: format!("Redirect error: {}", e),
            timed_out: false,
        }
    } else {
        FetchOutcome::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
