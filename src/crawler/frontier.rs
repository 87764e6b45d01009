//! Frontier queue and request pacing
//!
//! This module handles:
//! - The FIFO queue of discovered-but-not-visited targets
//! - Minimum delays between consecutive fetches
//! - Integrating robots.txt crawl delays
//!
//! The queue is first-in first-out, so the crawl is breadth-first: every page
//! at depth N is visited before any page at depth N + 1. Together with
//! document-order link extraction this makes the traversal deterministic for
//! the same site, which matters once the page ceiling cuts the crawl short.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// The URL to fetch
    pub url: Url,

    /// Link distance from the homepage
    pub depth: u32,

    /// Anchor text of the link that discovered this target (`None` for the seed)
    pub anchor_text: Option<String>,
}

impl CrawlTarget {
    /// The homepage target at depth 0
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            depth: 0,
            anchor_text: None,
        }
    }

    /// A target discovered through a link that passed the relevance filter
    pub fn discovered(url: Url, depth: u32, anchor_text: String) -> Self {
        Self {
            url,
            depth,
            anchor_text: Some(anchor_text),
        }
    }
}

/// Frontier manages the crawl queue and the pause between fetches
#[derive(Debug)]
pub struct Frontier {
    /// Targets waiting to be visited, oldest first
    queue: VecDeque<CrawlTarget>,

    /// Minimum time between two fetches
    min_delay: Duration,

    /// When the last fetch was started
    last_request: Option<Instant>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `min_delay` - Minimum time between consecutive fetches
    pub fn new(min_delay: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            min_delay,
            last_request: None,
        }
    }

    /// Adds a target to the back of the queue
    pub fn push(&mut self, target: CrawlTarget) {
        self.queue.push_back(target);
    }

    /// Removes the oldest target
    pub fn pop(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    /// Returns the number of queued targets
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Current minimum delay between fetches
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Raises the minimum delay to honor a robots.txt `Crawl-delay`
    pub fn apply_crawl_delay(&mut self, robots_delay: Option<f64>) {
        self.min_delay = effective_delay(self.min_delay, robots_delay);
    }

    /// Records that a fetch was started at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Time left before the next fetch may start, `None` if it may start now
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let ready_at = last + self.min_delay;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Sleeps until the next fetch may start, then records it
    pub async fn wait_for_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Pacing: waiting {:?} before next fetch", wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }
}

/// Upper bound on a robots.txt crawl delay
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Calculates the effective delay between fetches
///
/// This takes the maximum of:
/// - The configured request delay
/// - The robots.txt crawl delay (if specified), capped at `MAX_CRAWL_DELAY`
pub fn effective_delay(configured: Duration, robots_delay: Option<f64>) -> Duration {
    let Some(seconds) = robots_delay.filter(|s| s.is_finite() && *s > 0.0) else {
        return configured;
    };

    let robots = match Duration::try_from_secs_f64(seconds) {
        Ok(delay) if delay <= MAX_CRAWL_DELAY => delay,
        _ => {
            tracing::warn!(
                "robots.txt crawl delay of {}s capped at {:?}",
                seconds,
                MAX_CRAWL_DELAY
            );
            MAX_CRAWL_DELAY
        }
    };
    configured.max(robots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::RobotsPolicy;

    fn target(path: &str, depth: u32) -> CrawlTarget {
        let url = Url::parse(&format!("https://example.edu{}", path)).unwrap();
        CrawlTarget::discovered(url, depth, "link".to_string())
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new(Duration::ZERO);
        frontier.push(target("/a", 1));
        frontier.push(target("/b", 1));
        frontier.push(target("/c", 2));

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop().unwrap().url.path(), "/a");
        assert_eq!(frontier.pop().unwrap().url.path(), "/b");
        assert_eq!(frontier.pop().unwrap().url.path(), "/c");
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_seed_target() {
        let seed = CrawlTarget::seed(Url::parse("https://example.edu/").unwrap());
        assert_eq!(seed.depth, 0);
        assert_eq!(seed.anchor_text, None);
        assert_eq!(target("/a", 1).anchor_text.as_deref(), Some("link"));
    }

    #[test]
    fn test_no_wait_before_first_request() {
        let frontier = Frontier::new(Duration::from_secs(5));
        assert_eq!(frontier.time_until_next_request(Instant::now()), None);
    }

    #[test]
    fn test_wait_after_request() {
        let mut frontier = Frontier::new(Duration::from_millis(500));
        let now = Instant::now();
        frontier.record_request(now);

        let wait = frontier.time_until_next_request(now).unwrap();
        assert_eq!(wait, Duration::from_millis(500));

        let later = now + Duration::from_millis(600);
        assert_eq!(frontier.time_until_next_request(later), None);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut frontier = Frontier::new(Duration::ZERO);
        let now = Instant::now();
        frontier.record_request(now);
        assert_eq!(frontier.time_until_next_request(now), None);
    }

    #[test]
    fn test_effective_delay() {
        let configured = Duration::from_millis(200);
        assert_eq!(effective_delay(configured, None), configured);
        assert_eq!(
            effective_delay(configured, Some(2.0)),
            Duration::from_secs(2)
        );
        assert_eq!(effective_delay(configured, Some(0.1)), configured);
        assert_eq!(effective_delay(configured, Some(-1.0)), configured);
        assert_eq!(effective_delay(configured, Some(f64::NAN)), configured);
    }

    #[test]
    fn test_huge_crawl_delay_is_capped() {
        let configured = Duration::from_millis(200);
        assert_eq!(effective_delay(configured, Some(1e30)), MAX_CRAWL_DELAY);
        assert_eq!(effective_delay(configured, Some(f64::MAX)), MAX_CRAWL_DELAY);
        assert_eq!(effective_delay(configured, Some(86400.0)), MAX_CRAWL_DELAY);
        assert_eq!(effective_delay(configured, Some(60.0)), MAX_CRAWL_DELAY);
        assert_eq!(
            effective_delay(Duration::from_secs(90), Some(1e30)),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_robots_crawl_delay_from_policy_is_capped() {
        let policy = RobotsPolicy::from_content("User-agent: *\nCrawl-delay: 1e30\n");
        let mut frontier = Frontier::new(Duration::ZERO);
        frontier.apply_crawl_delay(policy.crawl_delay("ProgramScout"));
        assert_eq!(frontier.min_delay(), MAX_CRAWL_DELAY);
    }

    #[test]
    fn test_apply_crawl_delay() {
        let mut frontier = Frontier::new(Duration::ZERO);
        frontier.apply_crawl_delay(Some(1.5));
        assert_eq!(frontier.min_delay(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_wait_for_turn_records_request() {
        let mut frontier = Frontier::new(Duration::from_millis(10));
        frontier.wait_for_turn().await;
        let start = Instant::now();
        frontier.wait_for_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
