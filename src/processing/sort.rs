//! Single-column sorting for [`crate::types::DataSet`].

use std::cmp::Ordering;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

use super::coerce::Comparable;
use super::{split_spec, StageOutput};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = ProcessingError;

    /// Only the exact, lowercase `asc` and `desc` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(ProcessingError::InvalidDirection {
                direction: other.to_string(),
            }),
        }
    }
}

/// A parsed `column=direction` sort spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: Direction,
}

impl SortSpec {
    /// Parse `column=asc` or `column=desc`.
    ///
    /// Anything other than exactly one `=` is [`ProcessingError::InvalidSpec`]; a bad direction is
    /// [`ProcessingError::InvalidDirection`].
    pub fn parse(raw: &str) -> ProcessingResult<Self> {
        let (column, direction) = split_spec("sort spec", raw)?;
        Ok(Self {
            column: column.to_string(),
            direction: direction.parse()?,
        })
    }
}

/// Parse `spec` and sort the dataset by it.
///
/// An unknown direction leaves the dataset unchanged and is reported as a warning on the returned
/// [`StageOutput`]; a malformed spec is an error.
pub fn sort(dataset: &DataSet, spec: &str) -> ProcessingResult<StageOutput> {
    match SortSpec::parse(spec) {
        Ok(spec) => sort_with(dataset, &spec).map(StageOutput::applied),
        Err(e) if e.is_recoverable() => {
            warn!("sort skipped: {e}");
            Ok(StageOutput::skipped(dataset.clone(), e))
        }
        Err(e) => Err(e),
    }
}

/// Stable sort by one column.
///
/// Each cell is keyed through [`Comparable::from_cell`]: numeric-looking cells sort as numbers, the
/// rest as text. A column holding both kinds cannot be ordered and fails with
/// [`ProcessingError::MixedSortKeys`]. Ties keep their input order in both directions.
pub fn sort_with(dataset: &DataSet, spec: &SortSpec) -> ProcessingResult<DataSet> {
    let column = spec.column.as_str();
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| ProcessingError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let keys = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(pos, row)| Comparable::from_cell(row.get(idx).unwrap_or(""), pos, column))
        .collect::<ProcessingResult<Vec<_>>>()?;

    let numbers = keys.iter().filter(|k| k.is_number()).count();
    if numbers > 0 && numbers < keys.len() {
        return Err(ProcessingError::MixedSortKeys {
            column: column.to_string(),
        });
    }

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = keys[a].compare(&keys[b]).unwrap_or(Ordering::Equal);
        match spec.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });

    debug!("sorted {} rows by '{column}' ({:?})", order.len(), spec.direction);
    Ok(dataset.with_rows(order.into_iter().map(|i| dataset.rows[i].clone()).collect()))
}
