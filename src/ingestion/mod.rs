//! Loading record sets from disk.
//!
//! Most callers should use [`json::load_json_from_path`]. The interactive filename prompt lives in
//! [`crate::session::load_interactive`], which builds on [`json::normalize_filename`].

pub mod json;

pub use json::{load_json_from_path, load_json_from_str, normalize_filename, DEFAULT_FILENAME};
