//! Path-based loading with format detection.
//!
//! [`ingest_from_path`] picks the reader from [`IngestionOptions::format`] or, when that is unset,
//! from the file extension, and reports the outcome to the configured [`LoadObserver`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::report::{LoadEvent, LoadObserver, Source};
use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header line.
    Csv,
    /// JSON array of flat objects, or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Format for a file extension (case-insensitive): `csv`, `json` or `ndjson`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format for `path`, from its extension.
    pub fn detect(path: &Path) -> IngestionResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            IngestionError::UnsupportedFormat {
                message: format!("cannot infer format: path has no extension ({})", path.display()),
            }
        })?;
        Self::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ),
        })
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IngestionFormat::Csv => "csv",
            IngestionFormat::Json => "json",
        })
    }
}

/// How [`ingest_from_path`] reads its file. [`Default`] detects the format and reports nothing.
#[derive(Clone, Default)]
pub struct IngestionOptions {
    /// Overrides extension-based detection.
    pub format: Option<IngestionFormat>,
    pub observer: Option<Arc<dyn LoadObserver>>,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Load `path` into a [`DataSet`].
///
/// Exactly one [`LoadEvent`] reaches the observer, including when the format cannot be
/// determined.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use csv_cruncher::ingestion::{ingest_from_path, IngestionOptions, LogObserver};
///
/// # fn main() -> Result<(), csv_cruncher::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(LogObserver)),
///     ..Default::default()
/// };
/// let ds = ingest_from_path("products.csv", &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => Ok(f),
        None => IngestionFormat::detect(path),
    };

    let (source, result) = match format {
        Ok(f) => (Source::new(path, Some(f)), read(path, f)),
        Err(e) => (Source::new(path, None), Err(e)),
    };

    if let Some(obs) = &options.observer {
        let event = match &result {
            Ok(ds) => LoadEvent::Loaded {
                source: &source,
                rows: ds.row_count(),
                columns: ds.schema.len(),
            },
            Err(error) => LoadEvent::Unreadable {
                source: &source,
                error,
            },
        };
        obs.on_load(&event);
    }
    result
}

fn read(path: &Path, format: IngestionFormat) -> IngestionResult<DataSet> {
    match format {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Json => json::ingest_json_from_path(path),
    }
}
