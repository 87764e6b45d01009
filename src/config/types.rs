use crate::config::keywords::{
    to_owned_list, DEFAULT_ALLOW_KEYWORDS, DEFAULT_DEGREE_KEYWORDS, DEFAULT_DENY_KEYWORDS,
};
use serde::Deserialize;

/// Main configuration structure for Program-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// External text-inference service; title inference is disabled when absent
    #[serde(default)]
    pub inference: Option<InferenceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl and what to look for
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    /// Institution name, used only in report headings
    #[serde(default)]
    pub institution: Option<String>,

    /// Homepage URL; every crawled URL must start with this string
    #[serde(default)]
    pub homepage: String,

    /// Free-text description of the programs of interest
    #[serde(default)]
    pub criteria: String,
}

/// Which fetcher implementation the crawler uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Headless browser that dumps the rendered DOM
    Browser,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth from the homepage (unbounded when absent)
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    /// Maximum number of pages visited in one crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Whether robots.txt on the homepage host is consulted
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    #[serde(rename = "fetch-strategy", default)]
    pub fetch_strategy: FetchStrategy,

    /// Browser executable used by the browser fetch strategy
    #[serde(rename = "browser-binary", default = "default_browser_binary")]
    pub browser_binary: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: 0,
            respect_robots: true,
            fetch_strategy: FetchStrategy::Http,
            browser_binary: default_browser_binary(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Keyword lists for link relevance and heading heuristics
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    #[serde(default = "default_deny")]
    pub deny: Vec<String>,

    #[serde(default = "default_degree")]
    pub degree: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            allow: default_allow(),
            deny: default_deny(),
            degree: default_degree(),
        }
    }
}

/// Title extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// CSS selectors tried in order for the structured title
    #[serde(default = "default_selectors")]
    pub selectors: Vec<String>,

    /// Minimum visible-text length before inference is attempted
    #[serde(rename = "min-text-length", default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Number of visible-text characters sent to the inference service
    #[serde(rename = "excerpt-chars", default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Maximum number of pages extracted concurrently
    #[serde(
        rename = "max-concurrent-inference",
        default = "default_max_concurrent_inference"
    )]
    pub max_concurrent_inference: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            selectors: default_selectors(),
            min_text_length: default_min_text_length(),
            excerpt_chars: default_excerpt_chars(),
            max_concurrent_inference: default_max_concurrent_inference(),
        }
    }
}

/// OpenAI-compatible chat completion service
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(rename = "timeout-secs", default = "default_inference_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_inference_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV export
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,

    /// Optional path for a markdown copy of the results table
    #[serde(rename = "markdown-path", default)]
    pub markdown_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            markdown_path: None,
        }
    }
}

fn default_max_pages() -> usize {
    300
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_browser_binary() -> String {
    "chromium".to_string()
}

fn default_crawler_name() -> String {
    "ProgramScout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_allow() -> Vec<String> {
    to_owned_list(DEFAULT_ALLOW_KEYWORDS)
}

fn default_deny() -> Vec<String> {
    to_owned_list(DEFAULT_DENY_KEYWORDS)
}

fn default_degree() -> Vec<String> {
    to_owned_list(DEFAULT_DEGREE_KEYWORDS)
}

fn default_selectors() -> Vec<String> {
    vec!["h1".to_string()]
}

fn default_min_text_length() -> usize {
    200
}

fn default_excerpt_chars() -> usize {
    4000
}

fn default_max_concurrent_inference() -> usize {
    4
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_inference_timeout_secs() -> u64 {
    30
}

fn default_csv_path() -> String {
    "programs.csv".to_string()
}
