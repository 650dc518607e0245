//! In-memory record operations.
//!
//! The processing layer works on slices of [`crate::types::Record`] taken from a loaded
//! [`crate::types::RecordSet`]. It is purely in-memory and single-threaded.
//!
//! Currently implemented:
//!
//! - [`sort()`]: stable ascending bubble sort, with descending order as an explicit reversal
//! - [`filter()`]: case-insensitive textual equality on one field
//! - [`aggregate()`]: numeric or categorical summary of one field
//!
//! ## Example: sort → filter → aggregate
//!
//! ```rust
//! use record_explorer::processing::{aggregate, filter, sort, AggregateOptions, Aggregation, SortOrder};
//! use record_explorer::types::{Record, Value};
//!
//! let records = vec![
//!     Record::from_iter([("name", Value::from("Bob")), ("age", Value::from(30))]),
//!     Record::from_iter([("name", Value::from("Amy")), ("age", Value::from(25))]),
//!     Record::from_iter([("name", Value::from("bob")), ("age", Value::from(41))]),
//! ];
//!
//! let sorted = sort(&records, "age", SortOrder::Ascending).unwrap();
//! assert_eq!(sorted[0].get("name"), Some(&Value::from("Amy")));
//!
//! let bobs = filter(&sorted, "name", "BOB").unwrap();
//! assert_eq!(bobs.len(), 2);
//!
//! let Aggregation::Numeric(summary) = aggregate(&bobs, "age", &AggregateOptions::default()).unwrap()
//! else {
//!     unreachable!()
//! };
//! assert_eq!(summary.average, 35.5);
//! ```

pub mod aggregate;
pub mod filter;
pub mod sort;

pub use aggregate::{
    aggregate, AggregateOptions, Aggregation, CategoricalSummary, KindDetection, NumericSummary,
};
pub use filter::{filter, filter_rows, value_matches};
pub use sort::{bubble_sort, compare_values, reverse, sort, SortOrder, SortStats};
