use crate::config::types::{
    Config, CrawlerConfig, ExtractionConfig, FetchStrategy, InferenceConfig, KeywordConfig,
    OutputConfig, TargetConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
///
/// This is the blocking precondition check run before any crawl starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target(&config.target)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_keywords(&config.keywords)?;
    validate_extraction_config(&config.extraction)?;
    if let Some(inference) = &config.inference {
        validate_inference_config(inference)?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl target: homepage and criteria are required
fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
    let homepage = target.homepage.trim();
    if homepage.is_empty() {
        return Err(ConfigError::MissingInput("target.homepage"));
    }

    let url = Url::parse(homepage)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid homepage '{}': {}", homepage, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Homepage '{}' must use an http or https scheme",
            homepage
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Homepage '{}' has no host",
            homepage
        )));
    }

    if target.criteria.trim().is_empty() {
        return Err(ConfigError::MissingInput("target.criteria"));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 10_000 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 10000, got {}",
            config.max_pages
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.fetch_strategy == FetchStrategy::Browser && config.browser_binary.trim().is_empty()
    {
        return Err(ConfigError::Validation(
            "browser_binary cannot be empty when fetch_strategy is \"browser\"".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates keyword lists
fn validate_keywords(config: &KeywordConfig) -> Result<(), ConfigError> {
    if config.allow.is_empty() {
        return Err(ConfigError::Validation(
            "keywords.allow must contain at least one term".to_string(),
        ));
    }

    for keyword in config
        .allow
        .iter()
        .chain(&config.deny)
        .chain(&config.degree)
    {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "keyword lists cannot contain empty terms".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates extraction configuration, including that every selector parses
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    for selector in &config.selectors {
        Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
            selector: selector.clone(),
            message: format!("{:?}", e),
        })?;
    }

    if config.excerpt_chars == 0 {
        return Err(ConfigError::Validation(
            "excerpt_chars must be greater than 0".to_string(),
        ));
    }

    if config.max_concurrent_inference < 1 || config.max_concurrent_inference > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_inference must be between 1 and 32, got {}",
            config.max_concurrent_inference
        )));
    }

    Ok(())
}

/// Validates inference service configuration
fn validate_inference_config(config: &InferenceConfig) -> Result<(), ConfigError> {
    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid inference endpoint: {}", e)))?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "inference model cannot be empty".to_string(),
        ));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "inference timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
