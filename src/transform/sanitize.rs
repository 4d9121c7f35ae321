use std::collections::HashSet;
use std::fmt::Display;

use chrono::NaiveDate;
use tracing::info;

use crate::transform::coerce::CoercedRow;

/// Categorical fill-in for a missing or empty region.
pub const REGION_SENTINEL: &str = "Unknown";

/// A row that survived sanitization: every required field present,
/// `quantity > 0` and `sales > 0`. Profit may legitimately be negative.
#[derive(Debug, Clone)]
pub struct ValidRow {
    pub date: NaiveDate,
    pub region: String,
    pub product: String,
    pub quantity: f64,
    pub sales: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeStats {
    pub duplicates_removed: usize,
    pub invalid_dropped: usize,
}

fn key_cell<T: Display>(v: &Option<T>) -> String {
    match v {
        Some(v) => format!("={}", v),
        None => "~".to_string(),
    }
}

/// Duplicate identity spans every source column: the six coerced fields plus
/// the raw text of any extra columns. Comparing coerced values makes "10"
/// and "10.0" collide, so a reformatted re-export of the same row is still a
/// duplicate.
fn dup_key(row: &CoercedRow) -> Vec<String> {
    let mut key = vec![
        key_cell(&row.date),
        key_cell(&row.region),
        key_cell(&row.product),
        key_cell(&row.quantity),
        key_cell(&row.sales),
        key_cell(&row.profit),
    ];
    key.extend(row.extras.iter().cloned());
    key
}

/// Sanitize coerced rows. The step order is fixed and load-bearing:
/// 1. fill the region sentinel (duplicate detection must see it),
/// 2. drop exact duplicates, first occurrence wins,
/// 3. drop rows missing a required field,
/// 4. drop rows with non-positive quantity or sales.
/// Dropped counts are diagnostic only, never an error.
pub fn sanitize(mut rows: Vec<CoercedRow>) -> (Vec<ValidRow>, SanitizeStats) {
    for row in &mut rows {
        if row.region.is_none() {
            row.region = Some(REGION_SENTINEL.to_string());
        }
    }

    let before_dedup = rows.len();
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(dup_key(row)));
    let duplicates_removed = before_dedup - rows.len();

    let before_filter = rows.len();
    let valid: Vec<ValidRow> = rows
        .into_iter()
        .filter_map(|row| {
            Some(ValidRow {
                date: row.date?,
                region: row.region?,
                product: row.product?,
                quantity: row.quantity?,
                sales: row.sales?,
                profit: row.profit?,
            })
        })
        .filter(|row| row.quantity > 0.0 && row.sales > 0.0)
        .collect();
    let invalid_dropped = before_filter - valid.len();

    info!(
        "removed {} duplicate rows, dropped {} bad rows",
        duplicates_removed, invalid_dropped
    );

    (
        valid,
        SanitizeStats {
            duplicates_removed,
            invalid_dropped,
        },
    )
}
