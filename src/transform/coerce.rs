use chrono::NaiveDate;

use crate::extract::RawTable;
use crate::transform::schema::ColumnMap;

/// One row after per-value type coercion. A value that failed to parse is
/// `None` — an explicit missing marker, never an error at this stage. The raw
/// text of any extra columns rides along so duplicate detection can still see
/// the full source row.
#[derive(Debug, Clone)]
pub struct CoercedRow {
    pub date: Option<NaiveDate>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<f64>,
    pub sales: Option<f64>,
    pub profit: Option<f64>,
    pub extras: Vec<String>,
}

/// Date shapes the upstream export is known to emit.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

pub fn parse_date_opt(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

pub fn parse_num_opt(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    // NaN/inf in a sales export is garbage, same as unparsable.
    v.is_finite().then_some(v)
}

fn nonempty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Coerce every row of the raw table against the validated column map.
/// Never fails: data-quality problems become missing markers and are
/// resolved later by the sanitizer's row-level rules.
pub fn coerce_rows(table: &RawTable, map: &ColumnMap) -> Vec<CoercedRow> {
    let date_col = map.required("date");
    let region_col = map.required("region");
    let product_col = map.required("product");
    let sales_col = map.required("sales");
    let quantity_col = map.required("quantity");
    let profit_col = map.required("profit");
    let extra_cols = map.extra_columns();

    table
        .rows
        .iter()
        .map(|row| CoercedRow {
            date: parse_date_opt(table.cell(row, date_col)),
            region: nonempty(table.cell(row, region_col)),
            product: nonempty(table.cell(row, product_col)),
            quantity: parse_num_opt(table.cell(row, quantity_col)),
            sales: parse_num_opt(table.cell(row, sales_col)),
            profit: parse_num_opt(table.cell(row, profit_col)),
            extras: extra_cols
                .iter()
                .map(|&i| table.cell(row, i).to_string())
                .collect(),
        })
        .collect()
}
