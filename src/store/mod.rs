// src/store/mod.rs
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::EtlError;
use crate::transform::CleanRecord;

/// Columns that get a secondary index after every load, to back the
/// reporter's grouping and ordering.
const INDEXED_COLUMNS: [&str; 3] = ["date", "region", "product"];

/// SQLite-backed warehouse. One writer, one reader, strictly in that order;
/// callers serialize whole runs externally.
pub struct Warehouse {
    conn: Connection,
}

/// Table and column names are interpolated into SQL, so only plain
/// identifiers are accepted.
pub(crate) fn check_ident(name: &str) -> Result<(), EtlError> {
    let ok = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(EtlError::InvalidTableName(name.to_string()))
    }
}

impl Warehouse {
    /// Open (creating if needed) the warehouse database at `path`, creating
    /// parent directories first.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening warehouse db {}", path.display()))?;
        Ok(Self { conn })
    }

    /// In-memory warehouse, for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory().context("opening in-memory db")?,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Replace `table` wholesale with `records` — create-or-replace, never
    /// append — then make sure the secondary indexes exist. The whole load
    /// runs in one transaction; any store failure is fatal.
    pub fn replace_table(&mut self, table: &str, records: &[CleanRecord]) -> Result<()> {
        check_ident(table)?;
        info!("loading {} rows into table {}", records.len(), table);

        let tx = self.conn.transaction().map_err(EtlError::StoreWrite)?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {t};
             CREATE TABLE {t} (
                 date          TEXT    NOT NULL,
                 year          INTEGER NOT NULL,
                 month         INTEGER NOT NULL,
                 region        TEXT    NOT NULL,
                 product       TEXT    NOT NULL,
                 quantity      REAL    NOT NULL,
                 unit_price    REAL    NOT NULL,
                 sales         REAL    NOT NULL,
                 profit        REAL    NOT NULL,
                 profit_margin REAL    NOT NULL
             );",
            t = table
        ))
        .map_err(EtlError::StoreWrite)?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} (date, year, month, region, product, quantity, \
                     unit_price, sales, profit, profit_margin) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    table
                ))
                .map_err(EtlError::StoreWrite)?;
            for rec in records {
                stmt.execute(params![
                    // ISO-8601 text keeps lexicographic order chronological.
                    rec.date.to_string(),
                    rec.year,
                    rec.month,
                    rec.region,
                    rec.product,
                    rec.quantity,
                    rec.unit_price,
                    rec.sales,
                    rec.profit,
                    rec.profit_margin,
                ])
                .map_err(EtlError::StoreWrite)?;
            }
        }

        for col in INDEXED_COLUMNS {
            tx.execute(
                &format!(
                    "CREATE INDEX IF NOT EXISTS idx_{t}_{c} ON {t}({c})",
                    t = table,
                    c = col
                ),
                [],
            )
            .map_err(EtlError::StoreWrite)?;
        }

        tx.commit().map_err(EtlError::StoreWrite)?;
        info!("load complete");
        Ok(())
    }
}
