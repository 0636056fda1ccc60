//! Load reporting for [`super::ingest_from_path`].
//!
//! Every call reports exactly one [`LoadEvent`]: the file loaded (possibly with no rows), or it
//! could not be read. Either of the last two leaves the run with nothing to process.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// The file a load read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    /// `None` when the format could not be determined.
    pub format: Option<IngestionFormat>,
}

impl Source {
    pub(crate) fn new(path: &Path, format: Option<IngestionFormat>) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "{} ({format})", self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// Outcome of one load.
#[derive(Debug)]
pub enum LoadEvent<'a> {
    /// The header was read. `rows` may be zero.
    Loaded {
        source: &'a Source,
        rows: usize,
        columns: usize,
    },
    /// The source could not be loaded at all.
    Unreadable {
        source: &'a Source,
        error: &'a IngestionError,
    },
}

/// Receives the outcome of each load.
pub trait LoadObserver: Send + Sync {
    fn on_load(&self, event: &LoadEvent<'_>);
}

/// Writes load outcomes to the `log` facade: `info` for rows, `warn` for a header-only file,
/// `error` for an unreadable one.
#[derive(Debug, Default)]
pub struct LogObserver;

impl LoadObserver for LogObserver {
    fn on_load(&self, event: &LoadEvent<'_>) {
        match event {
            LoadEvent::Loaded {
                source,
                rows: 0,
                columns,
            } => warn!("{source}: header with {columns} columns but no rows"),
            LoadEvent::Loaded {
                source,
                rows,
                columns,
            } => info!("{source}: loaded {rows} rows x {columns} columns"),
            LoadEvent::Unreadable { source, error: e } => error!("could not read {source}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Source;
    use crate::ingestion::IngestionFormat;

    #[test]
    fn source_display_names_the_format_when_known() {
        let known = Source::new(Path::new("data/products.csv"), Some(IngestionFormat::Csv));
        assert_eq!(known.to_string(), "data/products.csv (csv)");

        let unknown = Source::new(Path::new("notes.txt"), None);
        assert_eq!(unknown.to_string(), "notes.txt");
    }
}
