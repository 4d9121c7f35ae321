use std::collections::HashMap;

use crate::error::EtlError;

/// Columns the export must carry, matched case/whitespace-insensitively.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "region", "product", "sales", "quantity", "profit"];

/// Normalized header lookup for a raw table. Column order is preserved;
/// unexpected columns pass through and are only consulted for duplicate
/// detection before the projection drops them.
#[derive(Debug)]
pub struct ColumnMap {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Index of a required column. Only valid on a map returned by
    /// [`validate_schema`], which guarantees presence.
    pub fn required(&self, name: &str) -> usize {
        self.index[name]
    }

    /// Indices of columns that are not part of the required set, in file
    /// order.
    pub fn extra_columns(&self) -> Vec<usize> {
        self.names
            .iter()
            .enumerate()
            .filter(|(i, n)| {
                !REQUIRED_COLUMNS.contains(&n.as_str()) || self.index[n.as_str()] != *i
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Normalize every header (trim + lowercase) and confirm the required set is
/// present. Missing names are reported exactly, sorted for stable output.
pub fn validate_schema(headers: &[String]) -> Result<ColumnMap, EtlError> {
    let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let mut index = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        // First occurrence wins on duplicate headers.
        index.entry(name.clone()).or_insert(i);
    }

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(EtlError::Schema { missing });
    }

    Ok(ColumnMap { names, index })
}
