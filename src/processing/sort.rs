//! Field ordering for record lists.
//!
//! Ordering is built from two explicit steps: a stable ascending [`bubble_sort`] and a
//! whole-sequence [`reverse`]. Descending order is the reversal of the ascending result, so
//! records with equal keys come out in the reverse of their input order.

use std::cmp::Ordering;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Record, Value};

/// Requested output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Work counters from one [`bubble_sort`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortStats {
    /// Full passes over the unsorted prefix (including the final swap-free pass).
    pub passes: usize,
    /// Adjacent pairs compared.
    pub comparisons: usize,
    /// Adjacent pairs swapped.
    pub swaps: usize,
}

/// Compare two values for ascending order.
///
/// Returns `None` when the pair is not comparable: mixed kinds, nulls and booleans. Such pairs
/// are left where they are, which can make the result depend on input order for heterogeneous
/// fields.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Utf8(x), Value::Utf8(y)) => Some(x.to_lowercase().cmp(&y.to_lowercase())),
        (Value::Int64(x), Value::Int64(y)) => Some(x.cmp(y)),
        (Value::Int64(_) | Value::Float64(_), Value::Int64(_) | Value::Float64(_)) => {
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        _ => None,
    }
}

/// Sort `records` ascending by `field`, in place.
///
/// Adjacent pairs are swapped only when the left value compares strictly greater, so equal keys
/// keep their relative order. Stops after the first pass without a swap.
///
/// Every record must carry `field`; otherwise returns [`ExplorerError::MissingField`] and leaves
/// `records` untouched.
pub fn bubble_sort(records: &mut [Record], field: &str) -> ExplorerResult<SortStats> {
    if let Some(idx) = records.iter().position(|r| !r.contains(field)) {
        return Err(ExplorerError::MissingField {
            row: idx + 1,
            field: field.to_string(),
        });
    }

    let mut stats = SortStats::default();
    let n = records.len();
    for i in 0..n.saturating_sub(1) {
        stats.passes += 1;
        let mut swapped = false;
        for j in 0..n - i - 1 {
            stats.comparisons += 1;
            let greater = match (records[j].get(field), records[j + 1].get(field)) {
                (Some(a), Some(b)) => compare_values(a, b) == Some(Ordering::Greater),
                _ => false,
            };
            if greater {
                records.swap(j, j + 1);
                stats.swaps += 1;
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }

    Ok(stats)
}

/// Return the records in reverse order.
pub fn reverse(records: &[Record]) -> Vec<Record> {
    records.iter().rev().cloned().collect()
}

/// Return a copy of `records` ordered by `field`.
///
/// The copy is sorted ascending with [`bubble_sort`] and then passed through [`reverse`] when
/// `order` is [`SortOrder::Descending`].
pub fn sort(records: &[Record], field: &str, order: SortOrder) -> ExplorerResult<Vec<Record>> {
    let mut out = records.to_vec();
    bubble_sort(&mut out, field)?;
    Ok(match order {
        SortOrder::Ascending => out,
        SortOrder::Descending => reverse(&out),
    })
}
