//! Plain-text rendering of operation results.

use std::io::{self, Write};

use crate::error::ExplorerError;
use crate::execution::Outcome;
use crate::processing::Aggregation;
use crate::types::{Record, Value};

/// Turn a field name into a display label.
///
/// The first letter of each alphabetic run is upper-cased and the rest lower-cased, then
/// underscores become spaces: `first_name` → `First Name`, `userID` → `Userid`.
pub fn titleize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;
    for c in key.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(if c == '_' { ' ' } else { c });
            in_word = false;
        }
    }
    out
}

/// One output line for `record`, using `keys` for column order.
pub fn format_record(record: &Record, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| {
            let value = record
                .get(key)
                .map(Value::to_string)
                .unwrap_or_else(|| "N/A".to_string());
            format!("{}: {}", titleize(key), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print one line per record. Column order comes from the first record.
pub fn render_records<W: Write>(records: &[Record], out: &mut W) -> io::Result<()> {
    let Some(first) = records.first() else {
        return writeln!(out, "No data to display");
    };
    let keys: Vec<&str> = first.keys().collect();
    for record in records {
        writeln!(out, "{}", format_record(record, &keys))?;
    }
    Ok(())
}

/// Print an aggregation result block.
pub fn render_aggregation<W: Write>(result: &Aggregation, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Aggregation Results:")?;
    match result {
        Aggregation::Numeric(s) => {
            writeln!(out, "Average: {}", Value::Float64(s.average))?;
            writeln!(out, "Max: {}", s.max)?;
            writeln!(out, "Min: {}", s.min)?;
        }
        Aggregation::Categorical(s) => {
            writeln!(out, "Most Frequent: {}", s.most_frequent)?;
            writeln!(out, "Max: {}", s.max)?;
            writeln!(out, "Min: {}", s.min)?;
            writeln!(out, "Occurrences:")?;
            for (value, count) in &s.occurrences {
                writeln!(out, "   {value}: {count}")?;
            }
        }
    }
    Ok(())
}

/// Print the message for an aggregation that produced no result.
pub fn render_aggregation_failure<W: Write>(error: &ExplorerError, out: &mut W) -> io::Result<()> {
    writeln!(out, "{error}")?;
    writeln!(out, "No aggregation results to display.")
}

pub fn render_outcome<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<()> {
    match outcome {
        Outcome::Records(records) => render_records(records, out),
        Outcome::Aggregation(result) => render_aggregation(result, out),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_record, render_aggregation, render_aggregation_failure, render_records, titleize};
    use crate::error::ExplorerError;
    use crate::processing::{Aggregation, CategoricalSummary, NumericSummary};
    use crate::types::{Record, Value};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn titleize_matches_title_case_rules() {
        assert_eq!(titleize("name"), "Name");
        assert_eq!(titleize("first_name"), "First Name");
        assert_eq!(titleize("userID"), "Userid");
        assert_eq!(titleize("AGE"), "Age");
        assert_eq!(titleize("zip5code"), "Zip5Code");
        assert_eq!(titleize("o'neil"), "O'Neil");
    }

    #[test]
    fn records_render_one_line_each() {
        let records = vec![
            Record::from_iter([("name", Value::from("Amy")), ("home_town", Value::from("Oslo"))]),
            Record::from_iter([("name", Value::from("Bob"))]),
        ];
        let text = render(|out| render_records(&records, out));
        assert_eq!(
            text,
            "Name: Amy, Home Town: Oslo\nName: Bob, Home Town: N/A\n"
        );
    }

    #[test]
    fn empty_records_render_placeholder() {
        assert_eq!(render(|out| render_records(&[], out)), "No data to display\n");
    }

    #[test]
    fn format_record_prints_typed_values() {
        let r = Record::from_iter([
            ("score", Value::Float64(3.0)),
            ("active", Value::Bool(true)),
            ("note", Value::Null),
        ]);
        assert_eq!(
            format_record(&r, &["score", "active", "note"]),
            "Score: 3.0, Active: true, Note: null"
        );
    }

    #[test]
    fn numeric_block() {
        let result = Aggregation::Numeric(NumericSummary {
            average: 2.5,
            max: Value::Int64(4),
            min: Value::Int64(1),
        });
        assert_eq!(
            render(|out| render_aggregation(&result, out)),
            "\nAggregation Results:\nAverage: 2.5\nMax: 4\nMin: 1\n"
        );
    }

    #[test]
    fn categorical_block_indents_occurrences() {
        let result = Aggregation::Categorical(CategoricalSummary {
            most_frequent: "a".to_string(),
            max: "b".to_string(),
            min: "a".to_string(),
            occurrences: vec![("a".to_string(), 2), ("b".to_string(), 1)],
        });
        assert_eq!(
            render(|out| render_aggregation(&result, out)),
            "\nAggregation Results:\nMost Frequent: a\nMax: b\nMin: a\nOccurrences:\n   a: 2\n   b: 1\n"
        );
    }

    #[test]
    fn failure_block() {
        let err = ExplorerError::NoValidData {
            field: "x".to_string(),
        };
        assert_eq!(
            render(|out| render_aggregation_failure(&err, out)),
            "No valid data found for key 'x'.\nNo aggregation results to display.\n"
        );
    }
}
