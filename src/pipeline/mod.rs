//! Staged crawl-and-extract pipeline
//!
//! A run moves through explicit stages, each owning everything the next one
//! needs:
//!
//! ```text
//! Pipeline --crawl()--> CrawledStage --extract()--> ExtractedStage --finish()--> PipelineOutcome
//! ```
//!
//! Input is validated when the `Pipeline` is built, so a bad homepage or empty
//! criteria fail before any request is made. Per-page problems never fail a
//! stage; they only shrink the result set.

use crate::config::{validate, Config};
use crate::crawler::{run_crawl, CrawlOutcome, CrawledPage, Fetcher};
use crate::extract::{generalize, ExtractedTitle, InferenceClient, TitleExtractor};
use crate::output::{CrawlStats, ResultRow, RunStats};
use crate::url::HomepageScope;
use crate::{ConfigError, ScoutError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Everything known about one candidate page after extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: Url,
    pub fetched_markup: Option<String>,
    pub title: Option<ExtractedTitle>,
    /// The URL with the homepage prefix and leading slashes removed
    pub relative_path: String,
    pub pattern: String,
}

impl PageRecord {
    /// Builds the record for a crawled page and its extracted title
    pub fn new(page: CrawledPage, title: Option<ExtractedTitle>, scope: &HomepageScope) -> Self {
        let relative_path = scope.relative_path(&page.url).unwrap_or_default();
        let pattern = generalize(&relative_path);

        Self {
            url: page.url,
            fetched_markup: page.markup,
            title,
            relative_path,
            pattern,
        }
    }

    /// One row per program name; none when the page has no title
    pub fn rows(&self) -> Vec<ResultRow> {
        let Some(title) = &self.title else {
            return Vec::new();
        };

        title
            .programs
            .iter()
            .map(|program| {
                ResultRow::new(
                    program.as_str(),
                    self.url.as_str(),
                    self.relative_path.as_str(),
                    self.pattern.as_str(),
                )
            })
            .collect()
    }
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The crawl and extraction produced no rows
    NoCandidates { stats: RunStats },
    /// At least one row was produced
    Success { rows: Vec<ResultRow>, stats: RunStats },
}

impl PipelineOutcome {
    /// Result rows (empty for `NoCandidates`)
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            Self::NoCandidates { .. } => &[],
            Self::Success { rows, .. } => rows,
        }
    }

    /// Run statistics
    pub fn stats(&self) -> &RunStats {
        match self {
            Self::NoCandidates { stats } | Self::Success { stats, .. } => stats,
        }
    }
}

/// A validated run that has not started crawling
pub struct Pipeline {
    config: Config,
    scope: HomepageScope,
    fetcher: Arc<dyn Fetcher>,
    extractor: TitleExtractor,
}

impl Pipeline {
    /// Validates the configuration and prepares a run
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `fetcher` - Page fetcher used by the crawl
    /// * `inference` - Optional inference fallback for title extraction
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a missing or invalid homepage, empty
    /// criteria, or any other invalid setting.
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        inference: Option<Arc<dyn InferenceClient>>,
    ) -> Result<Self, ConfigError> {
        validate(&config)?;

        let scope = HomepageScope::new(&config.target.homepage)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.target.homepage, e)))?;

        let mut extractor = TitleExtractor::new(&config.extraction, &config.keywords)?;
        if let Some(client) = inference {
            extractor = extractor.with_inference(client);
        }

        Ok(Self {
            config,
            scope,
            fetcher,
            extractor,
        })
    }

    /// The homepage scope of this run
    pub fn scope(&self) -> &HomepageScope {
        &self.scope
    }

    /// Crawls the site and collects the candidate pages
    pub async fn crawl(self) -> Result<CrawledStage, ScoutError> {
        let outcome = run_crawl(&self.config, self.fetcher.clone()).await?;
        Ok(CrawledStage {
            config: self.config,
            scope: self.scope,
            extractor: self.extractor,
            outcome,
        })
    }

    /// Runs every stage
    pub async fn run(self) -> Result<PipelineOutcome, ScoutError> {
        Ok(self.crawl().await?.extract().await?.finish())
    }
}

/// Candidate pages returned by the crawl
pub struct CrawledStage {
    config: Config,
    scope: HomepageScope,
    extractor: TitleExtractor,
    outcome: CrawlOutcome,
}

impl CrawledStage {
    /// Candidate pages in visit order
    pub fn pages(&self) -> &[CrawledPage] {
        &self.outcome.pages
    }

    /// Crawl counters
    pub fn stats(&self) -> &CrawlStats {
        &self.outcome.stats
    }

    /// Extracts titles for every candidate page
    ///
    /// Pages are processed concurrently, at most `max-concurrent-inference`
    /// at a time, and the records come back in crawl order.
    pub async fn extract(self) -> Result<ExtractedStage, ScoutError> {
        let CrawlOutcome { pages, stats } = self.outcome;
        let mut run_stats = RunStats {
            crawl: stats,
            candidates: pages.len(),
            ..RunStats::default()
        };

        tracing::info!(
            "Extracting titles from {} candidate pages (inference fallback {})",
            pages.len(),
            if self.extractor.has_inference() { "on" } else { "off" }
        );

        let semaphore = Arc::new(Semaphore::new(
            self.config.extraction.max_concurrent_inference.max(1),
        ));
        let extractor = Arc::new(self.extractor);
        let criteria: Arc<str> = Arc::from(self.config.target.criteria.as_str());

        let mut tasks = JoinSet::new();
        for (index, page) in pages.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let extractor = extractor.clone();
            let criteria = criteria.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let title = match &page.markup {
                    Some(markup) => extractor.extract_title(markup, &criteria).await,
                    None => None,
                };
                (index, page, title)
            });
        }

        let mut extracted = Vec::with_capacity(run_stats.candidates);
        while let Some(joined) = tasks.join_next().await {
            extracted.push(joined?);
        }
        extracted.sort_by_key(|(index, _, _)| *index);

        let records: Vec<PageRecord> = extracted
            .into_iter()
            .map(|(_, page, title)| {
                run_stats.record_title(title.as_ref().map(|t| t.source));
                match &title {
                    Some(t) => tracing::debug!("{}: {:?} ({:?})", page.url, t.programs, t.source),
                    None => tracing::debug!("{}: no title", page.url),
                }
                PageRecord::new(page, title, &self.scope)
            })
            .collect();

        Ok(ExtractedStage {
            records,
            stats: run_stats,
        })
    }
}

/// Page records with titles resolved
pub struct ExtractedStage {
    records: Vec<PageRecord>,
    stats: RunStats,
}

impl ExtractedStage {
    /// Records in crawl order, titled or not
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// Assembles the result rows
    pub fn finish(self) -> PipelineOutcome {
        let rows: Vec<ResultRow> = self.records.iter().flat_map(PageRecord::rows).collect();
        let mut stats = self.stats;
        stats.rows = rows.len();

        if rows.is_empty() {
            tracing::info!("No program pages found");
            PipelineOutcome::NoCandidates { stats }
        } else {
            tracing::info!("Found {} programs", rows.len());
            PipelineOutcome::Success { rows, stats }
        }
    }
}

/// Builds and runs a pipeline in one call
pub async fn run_pipeline(
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    inference: Option<Arc<dyn InferenceClient>>,
) -> Result<PipelineOutcome, ScoutError> {
    Pipeline::new(config, fetcher, inference)?.run().await
}
