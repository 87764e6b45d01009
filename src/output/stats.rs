//! Run statistics
//!
//! Counters collected while crawling and extracting, and their console report.

use crate::extract::TitleSource;
use std::time::Duration;

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStats {
    /// Targets popped and marked visited
    pub pages_visited: usize,

    /// Visits that produced usable markup
    pub pages_fetched: usize,

    /// Visits whose fetch failed (HTTP error, network error, non-HTML)
    pub fetch_failures: usize,

    /// Subset of `fetch_failures` that were timeouts
    pub timeouts: usize,

    /// Visits skipped because robots.txt disallowed them
    pub robots_denied: usize,

    /// Fetches that redirected outside the homepage scope
    pub off_scope_redirects: usize,

    /// In-scope links examined by the relevance filter
    pub links_examined: usize,

    /// Links that passed the filter and were queued
    pub links_enqueued: usize,

    /// Links rejected by the filter
    pub links_rejected: usize,

    /// Whether the crawl stopped at the page ceiling
    pub page_ceiling_reached: bool,

    /// Targets still queued when the crawl ended
    pub frontier_remaining: usize,

    /// Wall-clock duration of the crawl
    pub duration: Duration,
}

/// Counters for a whole pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub crawl: CrawlStats,

    /// Relevant visited pages handed to the title extractor
    pub candidates: usize,

    /// Titles found by configured selectors
    pub titles_from_selectors: usize,

    /// Titles found by the heading heuristic
    pub titles_from_headings: usize,

    /// Titles returned by the inference service
    pub titles_from_inference: usize,

    /// Candidates that yielded no title
    pub untitled: usize,

    /// Result rows produced
    pub rows: usize,
}

impl RunStats {
    /// Records which extraction step produced a title
    pub fn record_title(&mut self, source: Option<TitleSource>) {
        match source {
            Some(TitleSource::Selector) => self.titles_from_selectors += 1,
            Some(TitleSource::Heading) => self.titles_from_headings += 1,
            Some(TitleSource::Inference) => self.titles_from_inference += 1,
            None => self.untitled += 1,
        }
    }

    /// Percentage of candidates that produced a title
    pub fn title_rate(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            ((self.candidates - self.untitled) as f64 / self.candidates as f64) * 100.0
        }
    }
}

/// Formats statistics as a plain-text report
pub fn format_statistics(stats: &RunStats) -> String {
    let crawl = &stats.crawl;
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str("Crawl:\n");
    out.push_str(&format!("  Pages visited: {}\n", crawl.pages_visited));
    out.push_str(&format!("  Pages fetched: {}\n", crawl.pages_fetched));
    out.push_str(&format!(
        "  Fetch failures: {} ({} timeouts)\n",
        crawl.fetch_failures, crawl.timeouts
    ));
    if crawl.robots_denied > 0 {
        out.push_str(&format!("  Denied by robots.txt: {}\n", crawl.robots_denied));
    }
    if crawl.off_scope_redirects > 0 {
        out.push_str(&format!(
            "  Off-site redirects: {}\n",
            crawl.off_scope_redirects
        ));
    }
    out.push_str(&format!(
        "  Links examined: {} ({} queued, {} rejected)\n",
        crawl.links_examined, crawl.links_enqueued, crawl.links_rejected
    ));
    if crawl.page_ceiling_reached {
        out.push_str(&format!(
            "  Page ceiling reached with {} targets still queued\n",
            crawl.frontier_remaining
        ));
    }
    out.push_str(&format!("  Duration: {:.1}s\n\n", crawl.duration.as_secs_f64()));

    out.push_str("Extraction:\n");
    out.push_str(&format!("  Candidate pages: {}\n", stats.candidates));
    out.push_str(&format!(
        "  Titles: {} selector, {} heading, {} inference\n",
        stats.titles_from_selectors, stats.titles_from_headings, stats.titles_from_inference
    ));
    out.push_str(&format!("  Untitled pages: {}\n", stats.untitled));
    out.push_str(&format!(
        "  Title rate: {:.1}%\n",
        stats.title_rate()
    ));
    out.push_str(&format!("  Result rows: {}\n", stats.rows));

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStats) {
    println!("{}", format_statistics(stats));
}
