//! `csv-cruncher` loads a CSV file into memory and runs a small, fixed pipeline over its rows:
//! filter, sort, then either aggregate or limit.
//!
//! The primary entrypoints are [`ingestion::ingest_from_path`], which loads a file into a
//! [`types::DataSet`], and [`pipeline::run`], which applies the requested stages.
//!
//! ## Data model
//!
//! Every cell is kept as the text found in the file. Whether a value behaves as a number is decided
//! per operation (see [`processing::coerce`]):
//!
//! - filter and sort look at a numeric *prefix* and fall back to text comparison when there is
//!   none;
//! - aggregation requires every cell of the column to be a complete number.
//!
//! ## Stages
//!
//! - [`processing::filter()`]: `column<value`, `column>value` or `column=value`
//! - [`processing::sort()`]: `column=asc` or `column=desc` (stable)
//! - [`processing::aggregate()`]: `avg`, `min`, `max` or `median` of one column
//! - [`processing::head()`]: first `n` rows
//!
//! An unknown filter operator or sort direction is not fatal: the stage passes its input through
//! and a warning is reported. Every other problem (missing column, unconvertible number,
//! unsupported aggregate) fails the stage and ends the run.
//!
//! ## Example
//!
//! ```rust
//! use csv_cruncher::ingestion::csv::ingest_csv_from_str;
//! use csv_cruncher::pipeline::{run, PipelineOptions, PipelineResult};
//!
//! let ds = ingest_csv_from_str("id,name,price,qty\n1,A,10.5,2\n2,B,20.0,5\n3,C,15.0,1\n4,A,5.0,10\n")
//!     .unwrap();
//!
//! let opts = PipelineOptions {
//!     aggregate: Some("price=avg".to_string()),
//!     ..Default::default()
//! };
//! match run(&ds, &opts).unwrap().result {
//!     PipelineResult::Aggregate(agg) => assert_eq!(agg.value.value(), 12.75),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV/JSON loading and load reporting
//! - [`types`]: schema, row and dataset types
//! - [`processing`]: the filter/sort/aggregate/head stages
//! - [`pipeline`]: the stage driver
//! - [`render`]: table and JSON output
//! - [`cli`]: command-line arguments
//! - [`error`]: error types

pub mod cli;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod render;
pub mod types;

pub use error::{IngestionError, IngestionResult, PipelineError, ProcessingError, ProcessingResult};
