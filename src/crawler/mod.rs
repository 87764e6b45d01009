//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` capability with HTTP and headless-browser implementations
//! - HTML parsing and link extraction
//! - Keyword relevance filtering of discovered links
//! - The FIFO frontier and request pacing
//! - Overall crawl coordination

mod browser;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod relevance;

pub use browser::BrowserFetcher;
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, CrawlSettings, CrawledPage};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome, Fetcher, HttpFetcher, DEFAULT_TIMEOUT};
pub use frontier::{effective_delay, CrawlTarget, Frontier, MAX_CRAWL_DELAY};
pub use parser::{extract_links, LinkCandidate};
pub use relevance::{Relevance, RelevanceFilter};

pub(crate) use parser::collapse_whitespace;

use crate::config::{Config, FetchStrategy};
use crate::ScoutError;
use std::sync::Arc;
use std::time::Duration;

/// Builds the page fetcher selected by `[crawler] fetch-strategy`
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Fetcher>)` - Fetcher ready to share with the crawl
/// * `Err(ScoutError)` - The HTTP client could not be built
pub fn build_fetcher(config: &Config) -> Result<Arc<dyn Fetcher>, ScoutError> {
    let timeout = Duration::from_secs(config.crawler.timeout_secs);

    let fetcher: Arc<dyn Fetcher> = match config.crawler.fetch_strategy {
        FetchStrategy::Http => Arc::new(HttpFetcher::from_config(&config.user_agent, timeout)?),
        FetchStrategy::Browser => Arc::new(BrowserFetcher::new(
            config.crawler.browser_binary.clone(),
            timeout,
            config.user_agent.header_value(),
        )),
    };

    tracing::debug!(
        "Using {:?} fetch strategy with a {:?} timeout",
        config.crawler.fetch_strategy,
        timeout
    );
    Ok(fetcher)
}
