use std::convert::TryFrom;

use anyhow::{anyhow, Result};
use rusqlite::{Row, Rows};

pub fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

/// Drains `rows`, mapping each one with `map`.
pub fn collect_rows<T>(mut rows: Rows<'_>, map: impl Fn(&Row<'_>) -> Result<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(map(row)?);
    }
    Ok(items)
}
