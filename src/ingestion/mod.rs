//! Loading input files into a [`crate::types::DataSet`] of string cells.
//!
//! Most callers should use [`ingest_from_path`], which picks the reader by extension (or by
//! [`IngestionOptions::format`]) and reports the outcome to an optional [`LoadObserver`].
//!
//! Format-specific readers live in [`csv`] and [`json`].

pub mod csv;
pub mod json;
pub mod report;
pub mod unified;

pub use report::{LoadEvent, LoadObserver, LogObserver, Source};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
