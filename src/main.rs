//! Program-Scout main entry point
//!
//! This is the command-line interface for the Program-Scout program page cataloger.

use clap::Parser;
use program_scout::config::{load_config_with_hash, validate, Config};
use program_scout::crawler::build_fetcher;
use program_scout::extract::{InferenceClient, OpenAiClient};
use program_scout::output::{format_markdown_table, print_statistics, write_csv, write_markdown};
use program_scout::{Pipeline, PipelineOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Program-Scout: an academic program page cataloger
///
/// Program-Scout crawls an institution's website from its homepage, follows
/// links that look like academic program pages, and writes a table of program
/// names, URLs and URL patterns.
#[derive(Parser, Debug)]
#[command(name = "program-scout")]
#[command(version)]
#[command(about = "Catalog academic program pages on an institution's website", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// CSV output path (overrides [output] csv-path)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Homepage to crawl (overrides [target] homepage)
    #[arg(long, value_name = "URL")]
    homepage: Option<String>,

    /// Relevance criteria (overrides [target] criteria)
    #[arg(long, value_name = "TEXT")]
    criteria: Option<String>,

    /// Never call the inference service, even if [inference] is configured
    #[arg(long)]
    no_inference: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, apply overrides, then validate
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    apply_overrides(&mut config, &cli);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config, &config_hash, cli.no_inference);
    } else {
        handle_scout(config, cli.no_inference, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("program_scout=info,warn"),
            1 => EnvFilter::new("program_scout=debug,info"),
            2 => EnvFilter::new("program_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags take precedence over the file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(homepage) = &cli.homepage {
        config.target.homepage = homepage.clone();
    }
    if let Some(criteria) = &cli.criteria {
        config.target.criteria = criteria.clone();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, config_hash: &str, no_inference: bool) {
    println!("=== Program-Scout Dry Run ===\n");

    println!("Target:");
    if let Some(institution) = &config.target.institution {
        println!("  Institution: {}", institution);
    }
    println!("  Homepage: {}", config.target.homepage);
    println!("  Criteria: {}", config.target.criteria);

    println!("\nCrawler Configuration:");
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unbounded"),
    }
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  Fetch strategy: {:?}", config.crawler.fetch_strategy);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nKeywords:");
    println!("  Allow ({}): {}", config.keywords.allow.len(), config.keywords.allow.join(", "));
    println!("  Deny ({}): {}", config.keywords.deny.len(), config.keywords.deny.join(", "));
    println!("  Degree ({}): {}", config.keywords.degree.len(), config.keywords.degree.join(", "));

    println!("\nExtraction:");
    println!("  Selectors: {}", config.extraction.selectors.join(", "));
    match (&config.inference, no_inference) {
        (Some(inference), false) => println!(
            "  Inference: {} via {} (key from ${})",
            inference.model, inference.endpoint, inference.api_key_env
        ),
        (Some(_), true) => println!("  Inference: disabled by --no-inference"),
        (None, _) => println!("  Inference: not configured"),
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    if let Some(markdown) = &config.output.markdown_path {
        println!("  Markdown: {}", markdown);
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Builds the inference client, or explains why there is none
fn build_inference(config: &Config, no_inference: bool) -> Option<Arc<dyn InferenceClient>> {
    if no_inference {
        tracing::info!("Inference disabled by --no-inference");
        return None;
    }

    let inference = config.inference.as_ref()?;
    match OpenAiClient::from_config(inference) {
        Ok(client) => {
            tracing::info!("Inference fallback enabled ({})", inference.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("Inference fallback disabled: {}", e);
            None
        }
    }
}

/// Handles the main crawl-and-extract run
async fn handle_scout(
    config: Config,
    no_inference: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = build_fetcher(&config)?;
    let inference = build_inference(&config, no_inference);

    let homepage = config.target.homepage.clone();
    let csv_path = PathBuf::from(&config.output.csv_path);
    let markdown_path = config.output.markdown_path.clone();

    let pipeline = Pipeline::new(config, fetcher, inference)?;
    let outcome = match pipeline.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    match &outcome {
        PipelineOutcome::NoCandidates { .. } => {
            tracing::warn!("No academic program pages found under {}", homepage);
            if !quiet {
                println!("No academic program pages found under {}", homepage);
            }
        }
        PipelineOutcome::Success { rows, .. } => {
            write_csv(&csv_path, rows)?;
            if let Some(path) = &markdown_path {
                write_markdown(rows, &homepage, Path::new(path))?;
            }
            if !quiet {
                println!("{}", format_markdown_table(rows));
                println!("✓ {} programs written to {}", rows.len(), csv_path.display());
            }
        }
    }

    if !quiet {
        print_statistics(outcome.stats());
    }

    Ok(())
}
