use anyhow::Result;
use salesetl::pipeline;
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SOURCE: &str = "data/raw/raw_sales_data.csv";
const DEFAULT_DB: &str = "data/warehouse/sales.db";
const DEFAULT_TABLE: &str = "sales_clean";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) resolve paths (args override the defaults) ───────────────
    let mut args = env::args().skip(1);
    let source = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_SOURCE.to_string()));
    let db_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_DB.to_string()));
    let table = args.next().unwrap_or_else(|| DEFAULT_TABLE.to_string());
    let reports_dir = db_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // ─── 3) run the batch pipeline ───────────────────────────────────
    let summary = pipeline::run(&source, &db_path, &table, &reports_dir)?;

    info!(
        "ETL finished: {} extracted, {} loaded ({} duplicates, {} bad rows), {} reports",
        summary.rows_extracted,
        summary.rows_loaded,
        summary.duplicates_removed,
        summary.invalid_dropped,
        summary.reports_written.len()
    );
    Ok(())
}
