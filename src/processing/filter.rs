//! Record filtering.

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Record, Value};

/// Returns the records for which `predicate` returns `true`, in input order.
pub fn filter_rows<F>(records: &[Record], mut predicate: F) -> Vec<Record>
where
    F: FnMut(&Record) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(record))
        .cloned()
        .collect()
}

/// Case-insensitive textual match between a value and a target string.
///
/// Values are compared by their [`Display`](std::fmt::Display) form, so the integer `3` matches
/// `"3"` and the float `3.0` matches `"3.0"`.
pub fn value_matches(value: &Value, target: &str) -> bool {
    value.to_string().to_lowercase() == target.to_lowercase()
}

/// Keep the records whose `field` matches `target` (see [`value_matches`]).
///
/// Every record must carry `field`; the first record without it fails the whole call with
/// [`ExplorerError::MissingField`].
pub fn filter(records: &[Record], field: &str, target: &str) -> ExplorerResult<Vec<Record>> {
    if let Some(idx) = records.iter().position(|r| !r.contains(field)) {
        return Err(ExplorerError::MissingField {
            row: idx + 1,
            field: field.to_string(),
        });
    }
    Ok(filter_rows(records, |r| {
        r.get(field).is_some_and(|v| value_matches(v, target))
    }))
}
