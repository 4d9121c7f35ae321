// src/transform/mod.rs
pub mod coerce;
pub mod derive;
pub mod sanitize;
pub mod schema;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::extract::RawTable;
pub use sanitize::SanitizeStats;

/// A fully validated, derived sales record — the unit persisted and queried.
/// The field set is exactly the projected output schema; anything else from
/// the source file has been dropped by the time one of these exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub region: String,
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub sales: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

/// Run the whole transform stage: schema check, per-value coercion,
/// sanitization, derivation, then the final sort by `(date, region,
/// product)`. The sort is stable, so fully tied rows keep their source
/// order; position in the returned Vec is the row index.
pub fn transform(raw: &RawTable) -> Result<(Vec<CleanRecord>, SanitizeStats)> {
    info!("starting transform step");
    let map = schema::validate_schema(&raw.headers)?;
    let coerced = coerce::coerce_rows(raw, &map);
    let (valid, stats) = sanitize::sanitize(coerced);

    let mut records: Vec<CleanRecord> = valid.into_iter().map(derive::derive).collect();
    records.sort_by(|a, b| {
        (a.date, &a.region, &a.product).cmp(&(b.date, &b.region, &b.product))
    });

    info!("transform complete: {} rows", records.len());
    Ok((records, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: ["Date", "Region", "Product", "Sales", "Quantity", "Profit"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn duplicate_pair_collapses_to_one_record() -> Result<()> {
        let table = raw(&[
            &["2024-01-05", "East", "Widget", "100", "10", "20"],
            &["2024-01-05", "East", "Widget", "100", "10", "20"],
        ]);
        let (records, stats) = transform(&table)?;
        assert_eq!(records.len(), 1);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(records[0].unit_price, 10.0);
        assert_eq!(records[0].profit_margin, 0.2);
        Ok(())
    }

    #[test]
    fn malformed_date_row_is_dropped() -> Result<()> {
        let table = raw(&[
            &["not-a-date", "East", "Widget", "100", "10", "20"],
            &["2024-01-05", "East", "Widget", "100", "10", "20"],
        ]);
        let (records, stats) = transform(&table)?;
        assert_eq!(records.len(), 1);
        assert_eq!(stats.invalid_dropped, 1);
        Ok(())
    }

    #[test]
    fn zero_quantity_never_reaches_derivation() -> Result<()> {
        let table = raw(&[&["2024-01-05", "East", "Widget", "100", "0", "20"]]);
        let (records, _) = transform(&table)?;
        assert!(records.is_empty());
        Ok(())
    }

    #[test]
    fn empty_region_with_negative_profit_is_retained() -> Result<()> {
        let table = raw(&[&["2024-02-01", "", "Gadget", "50", "5", "-5"]]);
        let (records, _) = transform(&table)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "Unknown");
        assert_eq!(records[0].profit, -5.0);
        assert_eq!(records[0].profit_margin, -0.1);
        Ok(())
    }

    #[test]
    fn output_is_sorted_regardless_of_input_order() -> Result<()> {
        let table = raw(&[
            &["2024-02-01", "West", "Widget", "10", "1", "1"],
            &["2024-01-05", "West", "Widget", "10", "1", "1"],
            &["2024-01-05", "East", "Widget", "10", "1", "1"],
            &["2024-01-05", "East", "Gadget", "10", "1", "1"],
        ]);
        let (records, _) = transform(&table)?;
        let keys: Vec<_> = records
            .iter()
            .map(|r| (r.date.to_string(), r.region.clone(), r.product.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(records[0].product, "Gadget");
        Ok(())
    }

    #[test]
    fn row_counts_never_increase_through_the_stage() -> Result<()> {
        let table = raw(&[
            &["2024-01-05", "East", "Widget", "100", "10", "20"],
            &["2024-01-05", "East", "Widget", "100", "10", "20"],
            &["bogus", "East", "Widget", "100", "10", "20"],
            &["2024-01-06", "East", "Widget", "-1", "10", "20"],
        ]);
        let (records, stats) = transform(&table)?;
        assert!(records.len() <= table.rows.len());
        assert_eq!(
            records.len() + stats.duplicates_removed + stats.invalid_dropped,
            table.rows.len()
        );
        Ok(())
    }

    #[test]
    fn year_and_month_come_from_date() -> Result<()> {
        let table = raw(&[&["2023-11-20", "East", "Widget", "100", "10", "20"]]);
        let (records, _) = transform(&table)?;
        assert_eq!(records[0].year, 2023);
        assert_eq!(records[0].month, 11);
        Ok(())
    }
}
