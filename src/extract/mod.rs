// src/extract/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::info;

use crate::error::EtlError;

/// The raw export as read from disk: header names as the file claims them,
/// plus every record as untyped cells. Rows may be ragged; nothing is
/// validated at this stage.
#[derive(Debug)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell at `(row, col)`, treating a missing trailing cell in a ragged
    /// row as empty.
    pub fn cell<'a>(&'a self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Read the whole source file into a [`RawTable`]. Fails fast with
/// [`EtlError::SourceNotFound`] if the path does not exist; any other read
/// problem is a hard error too (a half-read export is not worth cleaning).
pub fn extract_csv(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(EtlError::SourceNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    info!("reading raw CSV: {}", path.display());

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("reading CSV record")?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!("extracted {} rows, {} columns", rows.len(), headers.len());
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_source_is_fatal() {
        let err = extract_csv(Path::new("no/such/export.csv")).unwrap_err();
        match err.downcast_ref::<EtlError>() {
            Some(EtlError::SourceNotFound { .. }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn reads_ragged_rows() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "Date,Region,Product")?;
        writeln!(tmp, "2024-01-05,East,Widget")?;
        writeln!(tmp, "2024-01-06,West")?;
        tmp.flush()?;

        let table = extract_csv(tmp.path())?;
        assert_eq!(table.headers, vec!["Date", "Region", "Product"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(&table.rows[1], 2), "");
        Ok(())
    }
}
