//! Condition parsing and row filtering for [`crate::types::DataSet`].

use std::fmt;

use log::{debug, warn};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

use super::coerce::{cell_to_number, parse_strict_float, probe_numeric_prefix};
use super::StageOutput;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Gt,
    Eq,
}

impl Operator {
    /// Operators in the order a raw condition is scanned for them.
    const SCAN_ORDER: [Operator; 3] = [Operator::Lt, Operator::Gt, Operator::Eq];

    pub fn symbol(self) -> char {
        match self {
            Operator::Lt => '<',
            Operator::Gt => '>',
            Operator::Eq => '=',
        }
    }

    fn holds<T: PartialOrd>(self, left: T, right: T) -> bool {
        match self {
            Operator::Lt => left < right,
            Operator::Gt => left > right,
            Operator::Eq => left == right,
        }
    }
}

/// A parsed `column<op>operand` filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub operand: String,
}

impl Condition {
    /// Parse a raw condition such as `price<15` or `name=A`.
    ///
    /// The string is scanned for `<`, then `>`, then `=`. The first operator found wins and the
    /// string is split once, at its first occurrence, so `a<b<c` compares column `a` against the
    /// operand `b<c`. Column and operand are taken verbatim (no trimming).
    pub fn parse(raw: &str) -> ProcessingResult<Self> {
        Operator::SCAN_ORDER
            .iter()
            .find_map(|&op| {
                raw.split_once(op.symbol()).map(|(column, operand)| Condition {
                    column: column.to_string(),
                    operator: op,
                    operand: operand.to_string(),
                })
            })
            .ok_or_else(|| ProcessingError::UnknownOperator {
                condition: raw.to_string(),
            })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.operator.symbol(), self.operand)
    }
}

/// Parse `condition` and keep the rows that satisfy it.
///
/// A condition without any operator is not an error: the dataset passes through unchanged and the
/// returned [`StageOutput`] carries the [`ProcessingError::UnknownOperator`] as a warning.
pub fn filter(dataset: &DataSet, condition: &str) -> ProcessingResult<StageOutput> {
    match Condition::parse(condition) {
        Ok(cond) => filter_with(dataset, &cond).map(StageOutput::applied),
        Err(e) if e.is_recoverable() => {
            warn!("filter skipped: {e}");
            Ok(StageOutput::skipped(dataset.clone(), e))
        }
        Err(e) => Err(e),
    }
}

/// Keep the rows that satisfy an already-parsed [`Condition`].
///
/// If the operand looks numeric, the operand and every cell of the column are converted to floats
/// and compared numerically; a cell that does not convert aborts the whole filter. Otherwise the
/// raw strings are compared lexicographically.
pub fn filter_with(dataset: &DataSet, condition: &Condition) -> ProcessingResult<DataSet> {
    let column = condition.column.as_str();
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| ProcessingError::ColumnNotFound {
            column: column.to_string(),
        })?;
    let op = condition.operator;

    let out = if probe_numeric_prefix(&condition.operand) {
        let operand = parse_strict_float(&condition.operand).ok_or_else(|| {
            ProcessingError::InvalidOperand {
                operand: condition.operand.clone(),
            }
        })?;
        dataset.try_filter_rows(|pos, row| -> ProcessingResult<bool> {
            let cell = row.get(idx).unwrap_or("");
            Ok(op.holds(cell_to_number(cell, pos, column)?, operand))
        })?
    } else {
        let operand = condition.operand.as_str();
        dataset.filter_rows(|row| op.holds(row.get(idx).unwrap_or(""), operand))
    };

    debug!(
        "filter {condition}: {} of {} rows kept",
        out.row_count(),
        dataset.row_count()
    );
    Ok(out)
}
