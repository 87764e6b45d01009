//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with the homepage
//! - Enforcing the page ceiling, the depth limit and the homepage scope
//! - Coordinating robots checks, pacing, fetching and link extraction
//! - Collecting the relevant pages for title extraction
//!
//! The loop is sequential: one target is fetched, parsed and filtered, and its
//! children are queued, before the next target is popped.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, FetchOutcome, Fetcher};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::extract_links;
use crate::crawler::relevance::{Relevance, RelevanceFilter};
use crate::output::CrawlStats;
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::state::LinkLedger;
use crate::url::HomepageScope;
use crate::ScoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Limits and politeness settings for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Maximum link distance from the homepage (`None` = unbounded)
    pub max_depth: Option<u32>,

    /// Maximum number of visits
    pub max_pages: usize,

    /// Minimum delay between fetches
    pub request_delay: Duration,

    /// Whether robots.txt is consulted before each fetch
    pub respect_robots: bool,
}

impl CrawlSettings {
    /// Builds settings from the `[crawler]` configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            request_delay: Duration::from_millis(config.request_delay_ms),
            respect_robots: config.respect_robots,
        }
    }

    /// Returns true if a target at `depth` may be visited
    pub fn depth_allowed(&self, depth: u32) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// A visited page that was reached through a relevant link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    /// The URL that was requested
    pub url: Url,

    /// Link distance from the homepage
    pub depth: u32,

    /// Anchor text of the link that discovered the page
    pub anchor_text: String,

    /// Page markup; `None` when the fetch failed, robots.txt denied it, or
    /// the page redirected off the site
    pub markup: Option<String>,
}

/// Result of a finished crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlOutcome {
    /// Relevant visited pages in visit order (the homepage itself excluded)
    pub pages: Vec<CrawledPage>,

    /// Crawl counters
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    scope: HomepageScope,
    filter: RelevanceFilter,
    settings: CrawlSettings,
    robots: RobotsPolicy,
    robots_agent: String,
    frontier: Frontier,
    ledger: LinkLedger,
    stats: CrawlStats,
    pages: Vec<CrawledPage>,
}

impl Coordinator {
    /// Creates a coordinator with the homepage already queued
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page fetcher shared with nothing else
    /// * `scope` - The homepage scope; its homepage is the seed
    /// * `filter` - Relevance filter applied to discovered links
    /// * `settings` - Crawl limits
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        scope: HomepageScope,
        filter: RelevanceFilter,
        settings: CrawlSettings,
    ) -> Self {
        let mut frontier = Frontier::new(settings.request_delay);
        let mut ledger = LinkLedger::new();

        let seed = scope.homepage().clone();
        ledger.enqueue(&seed);
        frontier.push(CrawlTarget::seed(seed));

        Self {
            fetcher,
            scope,
            filter,
            settings,
            robots: RobotsPolicy::allow_all(),
            robots_agent: String::new(),
            frontier,
            ledger,
            stats: CrawlStats::default(),
            pages: Vec::new(),
        }
    }

    /// Creates a coordinator from the loaded configuration
    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, ScoutError> {
        let scope = HomepageScope::new(&config.target.homepage)?;
        Ok(Self::new(
            fetcher,
            scope,
            RelevanceFilter::from_config(&config.keywords),
            CrawlSettings::from_config(&config.crawler),
        )
        .with_robots_agent(&config.user_agent.crawler_name))
    }

    /// Sets the product token matched against robots.txt groups
    pub fn with_robots_agent(mut self, agent: &str) -> Self {
        self.robots_agent = agent.to_string();
        self
    }

    /// Installs a robots.txt policy and applies its crawl delay
    pub fn with_robots(mut self, robots: RobotsPolicy) -> Self {
        let delay = robots.crawl_delay(&self.robots_agent);
        self.frontier.apply_crawl_delay(delay);
        if let Some(seconds) = delay {
            tracing::info!(
                "robots.txt requests a crawl delay of {}s, pacing fetches {:?} apart",
                seconds,
                self.frontier.min_delay()
            );
        }
        self.robots = robots;
        self
    }

    /// Runs the main crawl loop to completion
    ///
    /// Stops when the frontier is empty or the page ceiling is reached. Per-page
    /// failures are counted and never end the crawl.
    pub async fn run(mut self) -> CrawlOutcome {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max {} pages, max depth {})",
            self.scope.prefix(),
            self.settings.max_pages,
            self.settings
                .max_depth
                .map_or_else(|| "unbounded".to_string(), |d| d.to_string())
        );

        loop {
            if self.ledger.visited_count() >= self.settings.max_pages {
                self.stats.page_ceiling_reached = !self.frontier.is_empty();
                tracing::info!(
                    "Page ceiling of {} reached, {} targets left unvisited",
                    self.settings.max_pages,
                    self.frontier.len()
                );
                break;
            }

            let Some(target) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            match self.process_target(target).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::error!("{}", e);
                    continue;
                }
            }

            let visited = self.ledger.visited_count();
            if visited % 10 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    visited,
                    self.frontier.len(),
                    visited as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        self.stats.pages_visited = self.ledger.visited_count();
        self.stats.frontier_remaining = self.frontier.len();
        self.stats.duration = start_time.elapsed();

        for (i, url) in self.ledger.visited().iter().enumerate() {
            tracing::trace!("Visit {}: {}", i + 1, url);
        }

        tracing::info!(
            "Crawl completed: {} pages visited, {} relevant, in {:?}",
            self.stats.pages_visited,
            self.pages.len(),
            self.stats.duration
        );

        CrawlOutcome {
            pages: self.pages,
            stats: self.stats,
        }
    }

    /// Visits a single target
    ///
    /// This method:
    /// 1. Discards visited, out-of-scope or too-deep targets
    /// 2. Marks the target visited
    /// 3. Checks robots.txt and waits for its turn
    /// 4. Fetches the page
    /// 5. Extracts, filters and queues its links
    ///
    /// Returns whether the target counted as a visit.
    async fn process_target(&mut self, target: CrawlTarget) -> Result<bool, ScoutError> {
        let url = target.url.clone();

        if self.ledger.is_visited(&url) {
            tracing::debug!("Skipping {} (already visited)", url);
            return Ok(false);
        }
        if !self.scope.contains(&url) {
            tracing::debug!("Skipping {} (outside {})", url, self.scope.prefix());
            return Ok(false);
        }
        if !self.settings.depth_allowed(target.depth) {
            tracing::debug!("Skipping {} (depth {})", url, target.depth);
            return Ok(false);
        }

        self.ledger.visit(&url)?;
        tracing::debug!("Visiting {} (depth {})", url, target.depth);

        let markup = self.fetch_target(&target).await;

        if let Some((final_url, body)) = &markup {
            self.enqueue_children(final_url, body, target.depth);
        }

        if let Some(anchor_text) = target.anchor_text {
            self.pages.push(CrawledPage {
                url,
                depth: target.depth,
                anchor_text,
                markup: markup.map(|(_, body)| body),
            });
        }

        Ok(true)
    }

    /// Fetches a target, returning the final URL and body when usable
    async fn fetch_target(&mut self, target: &CrawlTarget) -> Option<(Url, String)> {
        let url = &target.url;

        if self.settings.respect_robots && !self.robots.is_allowed(url.as_str(), &self.robots_agent)
        {
            tracing::info!("URL {} disallowed by robots.txt", url);
            self.stats.robots_denied += 1;
            return None;
        }

        self.frontier.wait_for_turn().await;

        let outcome = self.fetcher.fetch(url).await;
        if let Some(reason) = outcome.failure_reason() {
            tracing::warn!("Failed to fetch {}: {}", url, reason);
            self.stats.fetch_failures += 1;
            if outcome.is_timeout() {
                self.stats.timeouts += 1;
            }
            return None;
        }

        let FetchOutcome::Success {
            final_url, body, ..
        } = outcome
        else {
            return None;
        };

        if !self.scope.contains(&final_url) {
            tracing::info!(
                "{} redirected to {} outside {}, discarding content",
                url,
                final_url,
                self.scope.prefix()
            );
            self.stats.off_scope_redirects += 1;
            return None;
        }

        if final_url != *url && self.ledger.record_redirect(&final_url) {
            tracing::debug!("{} redirected to {}, marking it visited", url, final_url);
        }

        self.stats.pages_fetched += 1;
        Some((final_url, body))
    }

    /// Queues the relevant, unseen links of a fetched page
    fn enqueue_children(&mut self, base_url: &Url, body: &str, depth: u32) {
        let child_depth = depth + 1;
        if !self.settings.depth_allowed(child_depth) {
            return;
        }

        for link in extract_links(base_url, body, &self.scope) {
            self.stats.links_examined += 1;

            match self
                .filter
                .classify(&match_target(&link.href), &link.anchor_text)
            {
                Relevance::Allowed(term) => {
                    if self.ledger.enqueue(&link.href) {
                        tracing::debug!("Queued {} (matched '{}')", link.href, term);
                        self.stats.links_enqueued += 1;
                        self.frontier.push(CrawlTarget::discovered(
                            link.href,
                            child_depth,
                            link.anchor_text,
                        ));
                    }
                }
                Relevance::Denied(term) => {
                    tracing::debug!("Rejected {} (denied by '{}')", link.href, term);
                    self.stats.links_rejected += 1;
                }
                Relevance::NoMatch => {
                    tracing::trace!("Rejected {} (no keyword)", link.href);
                    self.stats.links_rejected += 1;
                }
            }
        }
    }
}

/// The part of a link the relevance filter sees: path and query, never the host
fn match_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Runs a complete crawl for the configured homepage
///
/// When `respect-robots` is enabled, robots.txt is fetched once up front with
/// a plain HTTP client, whatever fetch strategy is configured for pages.
pub async fn run_crawl(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<CrawlOutcome, ScoutError> {
    let mut coordinator = Coordinator::from_config(config, fetcher)?;

    if config.crawler.respect_robots {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;
        let robots = fetch_robots(&client, coordinator.scope.homepage()).await;
        coordinator = coordinator.with_robots(robots);
    }

    Ok(coordinator.run().await)
}
