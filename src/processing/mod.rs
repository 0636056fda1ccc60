//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion. Every
//! stage takes its input by reference and returns a new dataset whose rows share storage with the
//! input.
//!
//! Currently implemented:
//!
//! - [`filter()`]: keep rows matching a `column<op>value` condition
//! - [`sort()`]: stable sort by one column, `column=asc|desc`
//! - [`aggregate()`]: `avg` / `min` / `max` / `median` of one column
//! - [`head()`]: keep the first `n` rows
//!
//! ## Example: filter → sort → aggregate
//!
//! ```rust
//! use csv_cruncher::processing::{aggregate, filter, sort};
//! use csv_cruncher::types::{DataSet, Row, Schema};
//!
//! let ds = DataSet::new(
//!     Schema::new(["name", "price"]),
//!     vec![
//!         Row::new(["apple", "10.5"]),
//!         Row::new(["pear", "20.0"]),
//!         Row::new(["plum", "5.0"]),
//!     ],
//! );
//!
//! let cheap = filter(&ds, "price<15").unwrap().dataset;
//! let sorted = sort(&cheap, "price=asc").unwrap().dataset;
//! assert_eq!(sorted.value(0, "name"), Some("plum"));
//!
//! let avg = aggregate(&sorted, "price", "avg").unwrap();
//! assert_eq!(avg.value.value(), 7.75);
//! ```

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod limit;
pub mod sort;

pub use aggregate::{aggregate, aggregate_with, AggregateOp, AggregateResult, AggregateSpec, AggregateValue};
pub use coerce::{parse_strict_float, probe_numeric_prefix, Comparable};
pub use filter::{filter, filter_with, Condition, Operator};
pub use limit::head;
pub use sort::{sort, sort_with, Direction, SortSpec};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

/// Output of a stage that may degrade to a no-op.
///
/// When the stage input was malformed in a recoverable way (see
/// [`ProcessingError::is_recoverable`]), `dataset` is the unchanged input and `warning` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub dataset: DataSet,
    pub warning: Option<ProcessingError>,
}

impl StageOutput {
    pub(crate) fn applied(dataset: DataSet) -> Self {
        Self {
            dataset,
            warning: None,
        }
    }

    pub(crate) fn skipped(dataset: DataSet, warning: ProcessingError) -> Self {
        Self {
            dataset,
            warning: Some(warning),
        }
    }
}

/// Split a `column=value` option on its single `=`.
fn split_spec<'a>(what: &'static str, raw: &'a str) -> ProcessingResult<(&'a str, &'a str)> {
    let mut parts = raw.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(value), None) => Ok((column, value)),
        _ => Err(ProcessingError::InvalidSpec {
            what,
            raw: raw.to_string(),
        }),
    }
}
