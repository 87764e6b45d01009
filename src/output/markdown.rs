//! Markdown table generation
//!
//! This module renders result rows as a human-readable markdown report: a
//! short header with the crawled homepage and the time of the run, followed by
//! the results table.

use crate::output::row::{ResultRow, COLUMNS};
use crate::output::OutputResult;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report to a file
///
/// # Arguments
///
/// * `rows` - The result rows
/// * `homepage` - The crawled homepage, shown in the header
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown(rows: &[ResultRow], homepage: &str, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(rows, homepage, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote markdown report to {}", output_path.display());
    Ok(())
}

/// Formats the full report: header plus table
pub fn format_markdown_report(rows: &[ResultRow], homepage: &str, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Academic Programs\n\n");
    md.push_str(&format!("- **Homepage**: {}\n", homepage));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Programs**: {}\n\n", rows.len()));
    md.push_str(&format_markdown_table(rows));

    md
}

/// Formats rows as a markdown table
///
/// Pipes inside cells are escaped and line breaks become spaces, so every row
/// stays on one line.
pub fn format_markdown_table(rows: &[ResultRow]) -> String {
    let mut md = String::new();

    md.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
    md.push_str(&format!("|{}\n", "---|".repeat(COLUMNS.len())));

    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| escape_cell(c)).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
