//! CSV export

use crate::output::row::{ResultRow, COLUMNS};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes rows, header first, to any writer
pub fn write_csv_to<W: Write>(writer: W, rows: &[ResultRow]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes rows to a CSV file, replacing it if it exists
///
/// # Arguments
///
/// * `path` - Destination file
/// * `rows` - Rows in output order
pub fn write_csv(path: &Path, rows: &[ResultRow]) -> OutputResult<()> {
    let file = File::create(path)?;
    write_csv_to(file, rows)?;
    tracing::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
