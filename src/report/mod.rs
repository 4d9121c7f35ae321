// src/report/mod.rs
use anyhow::{Context, Result};
use rusqlite::types::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::EtlError;
use crate::store::{check_ident, Warehouse};

/// Aggregate function applied to the grouped rows.
#[derive(Debug, Clone, Copy)]
pub enum Aggregate {
    Sum { column: &'static str },
    /// Average of `column * scale` (e.g. a ratio reported as a percentage).
    AvgScaled { column: &'static str, scale: u32 },
}

/// How the result rows are ordered.
#[derive(Debug, Clone, Copy)]
pub enum OrderBy {
    AggregateDesc,
    GroupAsc,
}

/// One declarative report: group-by keys, aggregate, ordering, optional row
/// limit. The fixed battery below is just a slice of these; a new report is
/// one more entry.
#[derive(Debug, Clone, Copy)]
pub struct ReportSpec {
    pub name: &'static str,
    pub group_by: &'static [&'static str],
    pub aggregate: Aggregate,
    pub alias: &'static str,
    pub round_digits: u8,
    pub order: OrderBy,
    pub limit: Option<u32>,
}

pub const REPORTS: [ReportSpec; 4] = [
    ReportSpec {
        name: "total_sales_by_region",
        group_by: &["region"],
        aggregate: Aggregate::Sum { column: "sales" },
        alias: "total_sales",
        round_digits: 2,
        order: OrderBy::AggregateDesc,
        limit: None,
    },
    ReportSpec {
        name: "top_5_products_by_profit",
        group_by: &["product"],
        aggregate: Aggregate::Sum { column: "profit" },
        alias: "total_profit",
        round_digits: 2,
        order: OrderBy::AggregateDesc,
        limit: Some(5),
    },
    ReportSpec {
        name: "monthly_sales_summary",
        group_by: &["year", "month"],
        aggregate: Aggregate::Sum { column: "sales" },
        alias: "total_sales",
        round_digits: 2,
        order: OrderBy::GroupAsc,
        limit: None,
    },
    ReportSpec {
        name: "average_profit_margin_per_product",
        group_by: &["product"],
        aggregate: Aggregate::AvgScaled {
            column: "profit_margin",
            scale: 100,
        },
        alias: "avg_profit_margin_percent",
        round_digits: 2,
        order: OrderBy::AggregateDesc,
        limit: None,
    },
];

impl ReportSpec {
    fn agg_expr(&self) -> String {
        let inner = match self.aggregate {
            Aggregate::Sum { column } => format!("SUM({})", column),
            Aggregate::AvgScaled { column, scale } => format!("AVG({} * {})", column, scale),
        };
        format!("ROUND({}, {}) AS {}", inner, self.round_digits, self.alias)
    }

    fn sql(&self, table: &str) -> String {
        let keys = self.group_by.join(", ");
        let order = match self.order {
            OrderBy::AggregateDesc => format!("{} DESC", self.alias),
            OrderBy::GroupAsc => keys.clone(),
        };
        let limit = self
            .limit
            .map(|n| format!(" LIMIT {}", n))
            .unwrap_or_default();
        format!(
            "SELECT {keys}, {agg} FROM {table} GROUP BY {keys} ORDER BY {order}{limit}",
            keys = keys,
            agg = self.agg_expr(),
            table = table,
            order = order,
            limit = limit,
        )
    }

    /// Output header: group keys then the aggregate alias.
    fn columns(&self) -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = self.group_by.to_vec();
        cols.push(self.alias);
        cols
    }
}

/// A computed report: header plus result rows, independent of how it gets
/// written out.
#[derive(Debug)]
pub struct ReportTable {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Value>>,
}

/// Execute one spec against the loaded table. Store failures are fatal.
pub fn run_report(wh: &Warehouse, table: &str, spec: &ReportSpec) -> Result<ReportTable> {
    check_ident(table)?;
    let sql = spec.sql(table);

    let mut stmt = wh.conn().prepare(&sql).map_err(EtlError::StoreQuery)?;
    let width = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..width).map(|i| row.get::<_, Value>(i)).collect()
        })
        .map_err(EtlError::StoreQuery)?
        .collect::<rusqlite::Result<Vec<Vec<Value>>>>()
        .map_err(EtlError::StoreQuery)?;

    Ok(ReportTable {
        name: spec.name,
        columns: spec.columns(),
        rows,
    })
}

fn render_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(_) => String::new(),
    }
}

/// Write one report as `<out_dir>/<name>.csv`.
pub fn write_artifact(report: &ReportTable, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(format!("{}.csv", report.name));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(&report.columns)?;
    for row in &report.rows {
        writer.write_record(row.iter().map(|v| render_value(v)))?;
    }
    writer.flush().context("flushing report artifact")?;
    Ok(path)
}

/// Run the whole fixed battery and write one artifact per report.
pub fn run_reports(wh: &Warehouse, table: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(REPORTS.len());
    for spec in &REPORTS {
        let report = run_report(wh, table, spec)?;
        let path = write_artifact(&report, out_dir)?;
        info!("saved query result: {}", path.display());
        written.push(path);
    }
    Ok(written)
}
