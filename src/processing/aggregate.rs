//! Single-column aggregation for [`crate::types::DataSet`].

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

use super::coerce::cell_to_number;
use super::split_spec;

/// Built-in aggregate operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Arithmetic mean, rounded to 2 decimal places.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// Statistical median (mean of the two middle values for an even count).
    Median,
}

impl AggregateOp {
    /// Name used on the command line and as the result's field key.
    pub fn name(self) -> &'static str {
        match self {
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Median => "median",
        }
    }
}

impl FromStr for AggregateOp {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            "median" => Ok(AggregateOp::Median),
            other => Err(ProcessingError::UnsupportedAggregateOp {
                op: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed `column=op` aggregate spec. Both halves are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub column: String,
    pub op: AggregateOp,
}

impl AggregateSpec {
    pub fn parse(raw: &str) -> ProcessingResult<Self> {
        let (column, op) = split_spec("aggregate spec", raw)?;
        Ok(Self {
            column: column.trim().to_string(),
            op: op.trim().parse()?,
        })
    }
}

/// The computed statistic, tagged by the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
    Avg(f64),
    Min(f64),
    Max(f64),
    Median(f64),
}

impl AggregateValue {
    pub fn op(&self) -> AggregateOp {
        match self {
            AggregateValue::Avg(_) => AggregateOp::Avg,
            AggregateValue::Min(_) => AggregateOp::Min,
            AggregateValue::Max(_) => AggregateOp::Max,
            AggregateValue::Median(_) => AggregateOp::Median,
        }
    }

    /// Field key of the value in rendered output (`avg`, `min`, `max` or `median`).
    pub fn key(&self) -> &'static str {
        self.op().name()
    }

    pub fn value(&self) -> f64 {
        match *self {
            AggregateValue::Avg(v)
            | AggregateValue::Min(v)
            | AggregateValue::Max(v)
            | AggregateValue::Median(v) => v,
        }
    }
}

/// Result of [`aggregate`]: a `{column, <op>: value}` record.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub column: String,
    pub value: AggregateValue,
}

impl AggregateResult {
    /// `(key, value)` pairs in display order: `column` first, then the op-named value.
    pub fn fields(&self) -> [(&str, String); 2] {
        [
            ("column", self.column.clone()),
            (self.value.key(), self.value.value().to_string()),
        ]
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("column", &self.column)?;
        map.serialize_entry(self.value.key(), &self.value.value())?;
        map.end()
    }
}

/// Aggregate `column` with the operation named by `op`.
///
/// The operation is validated first: an unknown name fails with
/// [`ProcessingError::UnsupportedAggregateOp`] even if the column is also missing.
pub fn aggregate(dataset: &DataSet, column: &str, op: &str) -> ProcessingResult<AggregateResult> {
    let op: AggregateOp = op.parse()?;
    aggregate_with(dataset, column, op)
}

/// Aggregate `column` with an already-parsed [`AggregateOp`].
///
/// Every cell must be a complete float literal; a single bad cell fails the whole aggregation.
/// There is no partial result over the cells that did convert.
pub fn aggregate_with(
    dataset: &DataSet,
    column: &str,
    op: AggregateOp,
) -> ProcessingResult<AggregateResult> {
    let cells = dataset
        .column_values(column)
        .ok_or_else(|| ProcessingError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let mut values = cells
        .enumerate()
        .map(|(pos, cell)| cell_to_number(cell, pos, column))
        .collect::<ProcessingResult<Vec<f64>>>()?;

    if values.is_empty() {
        return Err(ProcessingError::EmptyAggregate {
            column: column.to_string(),
        });
    }

    let value = match op {
        AggregateOp::Avg => AggregateValue::Avg(round2(mean(&values))),
        AggregateOp::Min => AggregateValue::Min(extreme(&values, |v, best| v < best)),
        AggregateOp::Max => AggregateValue::Max(extreme(&values, |v, best| v > best)),
        AggregateOp::Median => AggregateValue::Median(median(&mut values)),
    };

    debug!("aggregate {op}({column}) over {} rows = {}", values.len(), value.value());
    Ok(AggregateResult {
        column: column.to_string(),
        value,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// First value that no later value beats. A NaN in first position wins, since nothing compares
/// less or greater than it; a NaN anywhere else is never picked.
fn extreme(values: &[f64], beats: impl Fn(f64, f64) -> bool) -> f64 {
    values[1..]
        .iter()
        .fold(values[0], |best, &v| if beats(v, best) { v } else { best })
}

/// Round half away from zero to two decimals. Magnitudes of 1e15 and above have no fractional
/// digits left, and scaling them could overflow.
fn round2(v: f64) -> f64 {
    if !v.is_finite() || v.abs() >= 1e15 {
        return v;
    }
    (v * 100.0).round() / 100.0
}
