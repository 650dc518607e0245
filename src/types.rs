//! Core data model types.
//!
//! A loaded JSON file becomes a [`RecordSet`]: a non-empty, ordered list of [`Record`]s, each an
//! ordered list of named [`Value`]s.

use std::fmt;

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};

/// Runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Missing/empty value.
    Null,
    /// Integer number.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// UTF-8 text.
    Text,
}

impl ValueKind {
    /// `true` for [`ValueKind::Integer`] and [`ValueKind::Float`].
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }

    /// Short lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Text => "str",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed value in a [`Record`].
///
/// Serializes as the plain JSON scalar it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int64(_) => ValueKind::Integer,
            Value::Float64(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Utf8(_) => ValueKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it is an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Textual form used by filtering and printing.
///
/// Integral floats keep a trailing `.0` so `3.0` never renders the same as the integer `3`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

/// One entry of a [`RecordSet`]: field names mapped to values, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create a record from ordered `(name, value)` pairs.
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Value stored under `name`, if the record has that field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// A field name validated against a [`RecordSet`]'s key menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSelector(String);

impl FieldSelector {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldSelector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// In-memory, ordered, non-empty collection of records loaded for a session.
///
/// Sorting reorders the records in place; record contents are never changed and records are
/// never added or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Create a record set. Fails with [`ExplorerError::EmptyDataSet`] if `records` is empty.
    pub fn new(records: Vec<Record>) -> ExplorerResult<Self> {
        if records.is_empty() {
            return Err(ExplorerError::EmptyDataSet);
        }
        Ok(Self { records })
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access for in-place reordering. The slice cannot change length.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// The field menu: keys of the first record, in source order.
    pub fn field_names(&self) -> Vec<&str> {
        self.records[0].keys().collect()
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<FieldSelector> {
        self.records[0]
            .contains(name)
            .then(|| FieldSelector(name.to_string()))
    }

    /// Resolve a user token to a field: a 1-based menu index, or an exact (case-sensitive) name.
    pub fn resolve_field(&self, token: &str) -> Option<FieldSelector> {
        let token = token.trim();
        let names = self.field_names();

        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = token.parse::<usize>() {
                if (1..=names.len()).contains(&n) {
                    return Some(FieldSelector(names[n - 1].to_string()));
                }
            }
        }

        names
            .contains(&token)
            .then(|| FieldSelector(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordSet, Value, ValueKind};
    use crate::error::ExplorerError;

    fn people() -> RecordSet {
        RecordSet::new(vec![
            Record::from_iter([("name", Value::from("Bob")), ("age", Value::from(30))]),
            Record::from_iter([("name", Value::from("Amy")), ("age", Value::from(25))]),
        ])
        .unwrap()
    }

    #[test]
    fn empty_record_set_is_rejected() {
        let err = RecordSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ExplorerError::EmptyDataSet));
    }

    #[test]
    fn field_names_follow_first_record_order() {
        assert_eq!(people().field_names(), vec!["name", "age"]);
    }

    #[test]
    fn resolve_field_by_index_and_name() {
        let ds = people();
        assert_eq!(ds.resolve_field("1").unwrap().as_str(), "name");
        assert_eq!(ds.resolve_field(" 2 ").unwrap().as_str(), "age");
        assert_eq!(ds.resolve_field("age").unwrap().as_str(), "age");
        assert!(ds.resolve_field("0").is_none());
        assert!(ds.resolve_field("3").is_none());
        assert!(ds.resolve_field("Age").is_none());
        assert!(ds.resolve_field("").is_none());
        assert!(ds.resolve_field("99999999999999999999999").is_none());
    }

    #[test]
    fn numeric_field_names_resolve_by_name_when_out_of_index_range() {
        let ds = RecordSet::new(vec![Record::from_iter([("2024", Value::from(1))])]).unwrap();
        assert_eq!(ds.resolve_field("1").unwrap().as_str(), "2024");
        assert_eq!(ds.resolve_field("2024").unwrap().as_str(), "2024");
    }

    #[test]
    fn display_keeps_float_and_int_distinct() {
        assert_eq!(Value::Int64(3).to_string(), "3");
        assert_eq!(Value::Float64(3.0).to_string(), "3.0");
        assert_eq!(Value::Float64(2.25).to_string(), "2.25");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("Bob").to_string(), "Bob");
        // positional form throughout, no exponent
        assert_eq!(Value::Float64(1e16).to_string(), "10000000000000000");
        assert_eq!(Value::Float64(1e-5).to_string(), "0.00001");
    }

    #[test]
    fn value_kinds() {
        assert!(Value::Int64(1).kind().is_numeric());
        assert!(Value::Float64(1.5).kind().is_numeric());
        assert!(!Value::Bool(true).kind().is_numeric());
        assert_eq!(Value::from("x").kind(), ValueKind::Text);
        assert_eq!(ValueKind::Bool.name(), "bool");
    }
}
