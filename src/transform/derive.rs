use chrono::Datelike;

use crate::transform::sanitize::ValidRow;
use crate::transform::CleanRecord;

/// Round to `digits` decimal places, half away from zero (`f64::round`
/// semantics). Report queries round the same way on the store side.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Compute the derived columns for a sanitized row. The sanitizer guarantees
/// `quantity > 0` and `sales > 0`, so both divisions are well-defined.
pub fn derive(row: ValidRow) -> CleanRecord {
    CleanRecord {
        unit_price: round_to(row.sales / row.quantity, 2),
        profit_margin: round_to(row.profit / row.sales, 4),
        year: row.date.year(),
        month: row.date.month(),
        date: row.date,
        region: row.region,
        product: row.product,
        quantity: row.quantity,
        sales: row.sales,
        profit: row.profit,
    }
}
