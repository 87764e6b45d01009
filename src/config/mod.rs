//! Configuration module for Program-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and holds the keyword lists the relevance filter and title extractor share.
//!
//! # Example
//!
//! ```no_run
//! use program_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

pub mod keywords;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, FetchStrategy, InferenceConfig, KeywordConfig,
    OutputConfig, TargetConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
