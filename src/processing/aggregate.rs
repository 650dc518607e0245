//! Summary statistics over a single field.
//!
//! The branch (numeric or categorical) is chosen from the field's values before any statistic is
//! computed; see [`KindDetection`]. Each branch then keeps only the values of its own kind.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Record, Value, ValueKind};

use super::sort::compare_values;

/// How [`aggregate`] picks the branch for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindDetection {
    /// Use the kind of the first non-null value.
    #[default]
    FirstValue,
    /// Use the most common kind among non-null values (integers and floats count together).
    /// Ties go to the kind seen first.
    Majority,
}

/// Options for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateOptions {
    pub detection: KindDetection,
}

/// Statistics for a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Mean, rounded to 2 decimal places.
    pub average: f64,
    /// First maximal value, keeping its integer/float variant.
    pub max: Value,
    /// First minimal value, keeping its integer/float variant.
    pub min: Value,
}

/// Statistics for a text field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    /// First value (in first-seen order) that reaches the highest count.
    pub most_frequent: String,
    /// Lexicographically greatest distinct value.
    pub max: String,
    /// Lexicographically smallest distinct value.
    pub min: String,
    /// Distinct values with their counts, in first-seen order.
    pub occurrences: Vec<(String, usize)>,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregation {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Branch {
    Numeric,
    Categorical,
    Unsupported(ValueKind),
}

impl Branch {
    fn of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Integer | ValueKind::Float => Branch::Numeric,
            ValueKind::Text => Branch::Categorical,
            other => Branch::Unsupported(other),
        }
    }
}

/// Aggregate `field` across `records`.
///
/// Records without the field and null values are skipped. Errors:
///
/// - [`ExplorerError::NoData`] if `records` is empty
/// - [`ExplorerError::NoValidData`] if no non-null values remain
/// - [`ExplorerError::NoNumericData`] / [`ExplorerError::NoTextData`] if the chosen branch finds
///   none of its own values
/// - [`ExplorerError::UnsupportedType`] if the chosen kind is neither numeric nor text
pub fn aggregate(
    records: &[Record],
    field: &str,
    options: &AggregateOptions,
) -> ExplorerResult<Aggregation> {
    if records.is_empty() {
        return Err(ExplorerError::NoData);
    }

    let values: Vec<&Value> = records
        .iter()
        .filter_map(|r| r.get(field))
        .filter(|v| !v.is_null())
        .collect();

    if values.is_empty() {
        return Err(ExplorerError::NoValidData {
            field: field.to_string(),
        });
    }

    match detect_branch(&values, options.detection) {
        Branch::Numeric => summarize_numeric(&values, field).map(Aggregation::Numeric),
        Branch::Categorical => summarize_text(&values, field).map(Aggregation::Categorical),
        Branch::Unsupported(kind) => Err(ExplorerError::UnsupportedType {
            field: field.to_string(),
            kind: kind.name().to_string(),
        }),
    }
}

fn detect_branch(values: &[&Value], detection: KindDetection) -> Branch {
    let first = Branch::of(values[0].kind());
    match detection {
        KindDetection::FirstValue => first,
        KindDetection::Majority => {
            let mut order: Vec<Branch> = Vec::new();
            let mut counts: HashMap<Branch, usize> = HashMap::new();
            for v in values {
                let b = Branch::of(v.kind());
                let c = counts.entry(b).or_insert(0);
                if *c == 0 {
                    order.push(b);
                }
                *c += 1;
            }
            let mut best = first;
            let mut best_count = 0;
            for b in order {
                let c = counts[&b];
                if c > best_count {
                    best = b;
                    best_count = c;
                }
            }
            best
        }
    }
}

fn summarize_numeric(values: &[&Value], field: &str) -> ExplorerResult<NumericSummary> {
    let numeric: Vec<&Value> = values
        .iter()
        .copied()
        .filter(|v| v.kind().is_numeric())
        .collect();

    let Some(&first) = numeric.first() else {
        return Err(ExplorerError::NoNumericData {
            field: field.to_string(),
        });
    };

    let mut sum = 0.0;
    let mut max = first;
    let mut min = first;
    for &v in &numeric {
        sum += v.as_f64().unwrap_or_default();
        if compare_values(v, max) == Some(Ordering::Greater) {
            max = v;
        }
        if compare_values(v, min) == Some(Ordering::Less) {
            min = v;
        }
    }

    Ok(NumericSummary {
        average: round2(sum / numeric.len() as f64),
        max: max.clone(),
        min: min.clone(),
    })
}

fn summarize_text(values: &[&Value], field: &str) -> ExplorerResult<CategoricalSummary> {
    let mut occurrences: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for s in values.iter().filter_map(|v| v.as_str()) {
        match index.get(s) {
            Some(&i) => occurrences[i].1 += 1,
            None => {
                index.insert(s, occurrences.len());
                occurrences.push((s.to_string(), 1));
            }
        }
    }

    if occurrences.is_empty() {
        return Err(ExplorerError::NoTextData {
            field: field.to_string(),
        });
    }

    let mut most_frequent = &occurrences[0];
    for entry in &occurrences {
        if entry.1 > most_frequent.1 {
            most_frequent = entry;
        }
    }
    let max = occurrences.iter().map(|(s, _)| s).max();
    let min = occurrences.iter().map(|(s, _)| s).min();

    Ok(CategoricalSummary {
        most_frequent: most_frequent.0.clone(),
        max: max.cloned().unwrap_or_default(),
        min: min.cloned().unwrap_or_default(),
        occurrences,
    })
}

/// Two decimal places, exact halves going to the even neighbour (`0.125` → `0.12`).
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
