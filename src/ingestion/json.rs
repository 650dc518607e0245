//! JSON loading implementation.
//!
//! Supported input is a JSON array of flat objects: `[{"a":1}, {"a":2}]`. Object keys keep the
//! order they have in the file. Values must be scalars (`null`, numbers, booleans, strings);
//! nested arrays and objects are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Record, RecordSet, Value};

/// Filename used when the user enters nothing at the filename prompt.
pub const DEFAULT_FILENAME: &str = "data.json";

/// Turn a raw filename answer into the path to open.
///
/// Empty input selects `default`; any other name gets `.json` appended unless it already ends
/// with it.
pub fn normalize_filename(input: &str, default: &str) -> PathBuf {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PathBuf::from(default)
    } else if trimmed.ends_with(".json") {
        PathBuf::from(trimmed)
    } else {
        PathBuf::from(format!("{trimmed}.json"))
    }
}

/// Load a JSON file into a [`RecordSet`].
pub fn load_json_from_path(path: impl AsRef<Path>) -> ExplorerResult<RecordSet> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load JSON from an in-memory string into a [`RecordSet`].
pub fn load_json_from_str(input: &str) -> ExplorerResult<RecordSet> {
    let parsed = serde_json::from_str::<serde_json::Value>(input)?;
    let items = match parsed {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(ExplorerError::NotAnArray {
                found: json_kind(&other).to_string(),
            });
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx0, item) in items.iter().enumerate() {
        let row = idx0 + 1;
        let obj = item
            .as_object()
            .ok_or(ExplorerError::RecordNotObject { row })?;

        let mut fields = Vec::with_capacity(obj.len());
        for (name, jv) in obj {
            fields.push((name.clone(), convert_json_value(row, name, jv)?));
        }
        records.push(Record::new(fields));
    }

    RecordSet::new(records)
}

fn convert_json_value(row: usize, field: &str, v: &serde_json::Value) -> ExplorerResult<Value> {
    match v {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::Utf8(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int64(i))
            } else if let Some(f) = n.as_f64() {
                // u64 beyond i64::MAX lands here too.
                Ok(Value::Float64(f))
            } else {
                Err(ExplorerError::UnsupportedValue {
                    row,
                    field: field.to_string(),
                    raw: v.to_string(),
                })
            }
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(ExplorerError::UnsupportedValue {
                row,
                field: field.to_string(),
                raw: v.to_string(),
            })
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load_json_from_str, normalize_filename, DEFAULT_FILENAME};
    use crate::error::ExplorerError;
    use crate::types::Value;

    #[test]
    fn normalize_filename_applies_default_and_extension() {
        assert_eq!(normalize_filename("", DEFAULT_FILENAME), PathBuf::from("data.json"));
        assert_eq!(normalize_filename("   ", DEFAULT_FILENAME), PathBuf::from("data.json"));
        assert_eq!(normalize_filename("people", DEFAULT_FILENAME), PathBuf::from("people.json"));
        assert_eq!(normalize_filename(" people.json ", DEFAULT_FILENAME), PathBuf::from("people.json"));
        assert_eq!(normalize_filename("dump.txt", DEFAULT_FILENAME), PathBuf::from("dump.txt.json"));
    }

    #[test]
    fn keeps_key_order_from_file() {
        let ds = load_json_from_str(r#"[{"zeta":1,"alpha":"x","mid":null}]"#).unwrap();
        assert_eq!(ds.field_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn converts_scalars_to_typed_values() {
        let ds = load_json_from_str(
            r#"[{"i":7,"f":2.5,"b":false,"s":"hi","n":null,"big":18446744073709551615}]"#,
        )
        .unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.get("i"), Some(&Value::Int64(7)));
        assert_eq!(r.get("f"), Some(&Value::Float64(2.5)));
        assert_eq!(r.get("b"), Some(&Value::Bool(false)));
        assert_eq!(r.get("s"), Some(&Value::Utf8("hi".to_string())));
        assert_eq!(r.get("n"), Some(&Value::Null));
        assert!(matches!(r.get("big"), Some(Value::Float64(_))));
    }

    #[test]
    fn rejects_non_array_top_level() {
        let err = load_json_from_str(r#"{"name":"Bob"}"#).unwrap_err();
        assert!(matches!(err, ExplorerError::NotAnArray { ref found } if found == "object"));
    }

    #[test]
    fn rejects_non_object_rows_and_nested_values() {
        let err = load_json_from_str(r#"[{"a":1}, 5]"#).unwrap_err();
        assert!(matches!(err, ExplorerError::RecordNotObject { row: 2 }));

        let err = load_json_from_str(r#"[{"tags":["a","b"]}]"#).unwrap_err();
        assert!(err.to_string().contains("field 'tags'"));
    }

    #[test]
    fn empty_array_and_malformed_input_are_errors() {
        assert!(matches!(load_json_from_str("[]").unwrap_err(), ExplorerError::EmptyDataSet));
        assert!(matches!(load_json_from_str("[{").unwrap_err(), ExplorerError::Json(_)));
    }
}
