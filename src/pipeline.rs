// src/pipeline.rs
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{extract, report, store::Warehouse, transform};

/// Counts from one completed run, for logging and assertions. Informational
/// only; a run either completes or fails fatally.
#[derive(Debug)]
pub struct RunSummary {
    pub rows_extracted: usize,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub invalid_dropped: usize,
    pub reports_written: Vec<PathBuf>,
}

/// One full batch run: extract → transform → load → report, strictly in
/// order. The destination table is replaced wholesale, so rerunning against
/// the same source and destination is idempotent. Concurrent runs against
/// one destination are unsupported; callers serialize externally.
pub fn run(source: &Path, db_path: &Path, table: &str, reports_dir: &Path) -> Result<RunSummary> {
    let raw = extract::extract_csv(source)?;
    let rows_extracted = raw.rows.len();

    let (records, stats) = transform::transform(&raw)?;

    let mut warehouse = Warehouse::open(db_path)?;
    warehouse.replace_table(table, &records)?;

    fs::create_dir_all(reports_dir)?;
    let reports_written = report::run_reports(&warehouse, table, reports_dir)?;

    info!(
        "run finished: db={} table={} rows={}",
        db_path.display(),
        table,
        records.len()
    );
    Ok(RunSummary {
        rows_extracted,
        rows_loaded: records.len(),
        duplicates_removed: stats.duplicates_removed,
        invalid_dropped: stats.invalid_dropped,
        reports_written,
    })
}
