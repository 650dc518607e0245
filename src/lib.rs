//! `record-explorer` loads a JSON array of flat records into an in-memory
//! [`types::RecordSet`] and lets a user sort, filter or aggregate it one field at a time from an
//! interactive prompt.
//!
//! The binary wires stdin/stdout into a [`session::Session`]; everything it does is available as a
//! library so it can be scripted and tested.
//!
//! ## Quick example: load and run operations directly
//!
//! ```rust
//! use record_explorer::execution::{ExecutionEngine, OperationParams, Outcome, Request};
//! use record_explorer::ingestion::load_json_from_str;
//! use record_explorer::processing::SortOrder;
//!
//! # fn main() -> Result<(), record_explorer::ExplorerError> {
//! let mut ds = load_json_from_str(r#"[{"name":"Bob","age":30},{"name":"Amy","age":25}]"#)?;
//! let engine = ExecutionEngine::default();
//!
//! let request = Request {
//!     field: ds.resolve_field("age").unwrap(),
//!     params: OperationParams::Sort { order: SortOrder::Ascending },
//! };
//! let Outcome::Records(sorted) = engine.run(&mut ds, &request)? else { unreachable!() };
//! assert_eq!(sorted[0].get("name").unwrap().to_string(), "Amy");
//! # Ok(())
//! # }
//! ```
//!
//! ## Scripted session
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use record_explorer::ingestion::load_json_from_str;
//! use record_explorer::session::{Session, SessionOptions};
//!
//! let ds = load_json_from_str(r#"[{"name":"Bob","age":30},{"name":"Amy","age":25}]"#).unwrap();
//! // filter by name = "bob", then decline and confirm exit
//! let input = Cursor::new("2\nname\nbob\nn\ny\n");
//! let mut session = Session::new(input, Vec::new(), ds, SessionOptions::default());
//! session.run().unwrap();
//!
//! let (_, output, _) = session.into_parts();
//! let text = String::from_utf8(output).unwrap();
//! assert!(text.contains("Name: Bob, Age: 30"));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: values, records and the record set
//! - [`ingestion`]: JSON loading and filename handling
//! - [`processing`]: sort, filter and aggregate
//! - [`execution`]: one request end to end, with metrics and events
//! - [`report`]: text rendering of results
//! - [`session`]: the interactive loop
//! - [`observability`] and [`logging`]: observer hooks and `tracing` setup
//! - [`error`]: the shared error type
//!
//! ### Known limitations
//!
//! - Sorting never swaps values of different kinds (text vs number, null, booleans), so a field
//!   with mixed kinds may come out partially ordered.
//! - By default aggregation branches on the kind of the first non-null value; see
//!   [`processing::KindDetection`].

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod logging;
pub mod observability;
pub mod processing;
pub mod report;
pub mod session;
pub mod types;

pub use error::{ErrorClass, ExplorerError, ExplorerResult};
