//! Per-cell type sniffing.
//!
//! Cells are always stored as text. Two separate checks decide whether a cell behaves as a number:
//!
//! - [`probe_numeric_prefix`]: a loose check that only looks at the start of the string. Filter and
//!   sort use it to choose between numeric and textual comparison.
//! - [`parse_strict_float`]: a full-string conversion. Aggregation uses it for every cell, and the
//!   filter/sort paths use it once the probe has picked numeric comparison.
//!
//! A value such as `"12abc"` passes the probe but fails the conversion. That combination is an
//! error, never a silent fallback to text.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ProcessingError, ProcessingResult};

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*").expect("numeric prefix pattern is valid"));

/// `true` if `s` starts with digits, optionally followed by a decimal point and more digits.
///
/// Only the prefix is checked: `"12abc"` matches, `"-5"` and `".5"` do not.
pub fn probe_numeric_prefix(s: &str) -> bool {
    NUMERIC_PREFIX.is_match(s)
}

/// Convert the whole of `s` to a float, ignoring surrounding whitespace.
///
/// Returns `None` if anything other than a complete float literal is present.
pub fn parse_strict_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Strictly convert the cell at `row` (zero-based) of `column`.
pub(crate) fn cell_to_number(cell: &str, row: usize, column: &str) -> ProcessingResult<f64> {
    parse_strict_float(cell).ok_or_else(|| ProcessingError::NumericConversion {
        row: row + 1,
        column: column.to_string(),
        raw: cell.to_string(),
    })
}

/// A cell value as seen by comparisons: a number when it looks numeric, the raw text otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparable<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> Comparable<'a> {
    /// Probe `cell`; numeric-looking cells are strictly converted, the rest stay text.
    ///
    /// `row` (zero-based) and `column` only feed the error message.
    pub fn from_cell(cell: &'a str, row: usize, column: &str) -> ProcessingResult<Self> {
        if probe_numeric_prefix(cell) {
            cell_to_number(cell, row, column).map(Comparable::Number)
        } else {
            Ok(Comparable::Text(cell))
        }
    }

    /// Order two values of the same kind. Numbers and text are not ordered against each other.
    ///
    /// `-0.0` and `0.0` compare equal, as they do under float equality.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::Text(a), Comparable::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Comparable::Number(_))
    }
}
