//! Output module for result tables and run reports
//!
//! This module handles:
//! - The `ResultRow` shape of the final table
//! - Exporting rows as CSV
//! - Rendering rows as a markdown table
//! - Recording and printing run statistics

mod csv_export;
mod markdown;
mod row;
pub mod stats;

pub use csv_export::{write_csv, write_csv_to};
pub use markdown::{format_markdown_report, format_markdown_table, write_markdown};
pub use row::{ResultRow, COLUMNS};
pub use stats::{format_statistics, print_statistics, CrawlStats, RunStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
