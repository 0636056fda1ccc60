//! Command-line definitions for `csv-cruncher`.
//!
//! [`Args`] maps directly onto [`IngestionOptions`] and [`PipelineOptions`]; [`run`] wires them
//! together and writes what the user sees.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use crate::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions, LogObserver};
use crate::pipeline::{LogPipelineObserver, Pipeline, PipelineOptions, PipelineResult};
use crate::render::{render_result, OutputFormat};

const NO_DATA_TO_PROCESS: &str = "no data to process";
const NO_DATA_TO_DISPLAY: &str = "no data to display";

/// Input file format (used to bypass extension-based detection).
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values with a header line
    Csv,
    /// JSON array of objects, or NDJSON
    Json,
}

impl From<InputFormat> for IngestionFormat {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Csv => IngestionFormat::Csv,
            InputFormat::Json => IngestionFormat::Json,
        }
    }
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Aligned plain-text table
    #[default]
    Table,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Command-line arguments for csv-cruncher
#[derive(Clone, Parser, Debug)]
#[command(
    name = "csv-cruncher",
    version,
    about = "Filter, sort, aggregate and limit the rows of a CSV file",
    after_help = "Stages run in a fixed order: --where, --order-by, then --aggregate (which ends the run) or --head.\n\n\
      Examples:\n  \
      csv-cruncher --file products.csv --where \"price<15\"\n  \
      csv-cruncher --file products.csv --order-by \"qty=desc\" --head 3\n  \
      csv-cruncher --file products.csv --where \"name=A\" --aggregate \"price=avg\""
)]
pub struct Args {
    /// Path to the file to process
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Keep rows matching a condition: column<value, column>value or column=value
    #[arg(long = "where", value_name = "CONDITION")]
    pub filter: Option<String>,

    /// Sort by a column: column=asc or column=desc
    #[arg(long = "order-by", value_name = "SPEC")]
    pub order_by: Option<String>,

    /// Aggregate a column and print only the result: column=avg|min|max|median
    #[arg(long, value_name = "SPEC")]
    pub aggregate: Option<String>,

    /// Show at most N rows (ignored with --aggregate)
    #[arg(long, value_name = "N")]
    pub head: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Table)]
    pub format: FormatArg,

    /// Input format; detected from the file extension when omitted
    #[arg(long = "input-format", value_enum)]
    pub input_format: Option<InputFormat>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            filter: self.filter.clone(),
            sort: self.order_by.clone(),
            aggregate: self.aggregate.clone(),
            limit: self.head,
        }
    }

    pub fn ingestion_options(&self) -> IngestionOptions {
        IngestionOptions {
            format: self.input_format.map(Into::into),
            observer: Some(Arc::new(LogObserver)),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.into()
    }

    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Load `args.file`, run the requested stages and write the result to `out`.
///
/// A file that cannot be loaded, or that has no rows, is not an error: the load failure goes to
/// the log and `out` gets "no data to process". A failing stage is returned as an error.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    // The load observer has already logged why.
    let Ok(dataset) = ingest_from_path(&args.file, &args.ingestion_options()) else {
        writeln!(out, "{NO_DATA_TO_PROCESS}")?;
        return Ok(());
    };

    let output = Pipeline::new(args.pipeline_options())
        .with_observer(Arc::new(LogPipelineObserver))
        .run(&dataset)?;

    if matches!(output.result, PipelineResult::NoData) {
        writeln!(out, "{NO_DATA_TO_PROCESS}")?;
        return Ok(());
    }

    match render_result(&output.result, args.output_format()).context("could not render result")? {
        Some(text) => writeln!(out, "{text}")?,
        None => writeln!(out, "{NO_DATA_TO_DISPLAY}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::{CommandFactory, Parser};

    use super::{run, Args, FormatArg, InputFormat};
    use crate::ingestion::IngestionFormat;
    use crate::pipeline::PipelineOptions;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_pipeline_options() {
        let args = Args::try_parse_from([
            "csv-cruncher",
            "--file",
            "products.csv",
            "--where",
            "price<15",
            "--order-by",
            "price=desc",
            "--aggregate",
            "qty=max",
            "--head",
            "3",
        ])
        .unwrap();

        assert_eq!(
            args.pipeline_options(),
            PipelineOptions {
                filter: Some("price<15".to_string()),
                sort: Some("price=desc".to_string()),
                aggregate: Some("qty=max".to_string()),
                limit: Some(3),
            }
        );
        assert_eq!(args.format, FormatArg::Table);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn file_is_required() {
        assert!(Args::try_parse_from(["csv-cruncher", "--where", "a=1"]).is_err());
    }

    #[test]
    fn head_must_be_a_non_negative_integer() {
        assert!(Args::try_parse_from(["csv-cruncher", "--file", "a.csv", "--head", "x"]).is_err());
        assert!(Args::try_parse_from(["csv-cruncher", "--file", "a.csv", "--head", "-1"]).is_err());
    }

    #[test]
    fn input_format_and_verbosity() {
        let args = Args::try_parse_from([
            "csv-cruncher",
            "--file",
            "data.txt",
            "--input-format",
            "json",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input_format, Some(InputFormat::Json));
        assert_eq!(args.ingestion_options().format, Some(IngestionFormat::Json));
        assert_eq!(args.log_level(), "debug");
    }

    fn run_to_string(argv: &[&str]) -> anyhow::Result<String> {
        let args = Args::try_parse_from(std::iter::once("csv-cruncher").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        run(&args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn unreadable_file_has_no_data_to_process() {
        let out = run_to_string(&["--file", "tests/fixtures/does_not_exist.csv"]).unwrap();
        assert_eq!(out, "no data to process\n");

        let out = run_to_string(&["--file", "tests/fixtures/products"]).unwrap();
        assert_eq!(out, "no data to process\n");
    }

    #[test]
    fn header_only_file_has_no_data_to_process() {
        let out = run_to_string(&["--file", "tests/fixtures/header_only.csv", "--aggregate", "price=avg"]).unwrap();
        assert_eq!(out, "no data to process\n");
    }

    #[test]
    fn filtered_to_nothing_has_no_data_to_display() {
        let out = run_to_string(&["--file", "tests/fixtures/products.csv", "--where", "price>100"]).unwrap();
        assert_eq!(out, "no data to display\n");
    }

    #[test]
    fn prints_aggregate_table() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "name,price\nA,10.5\nB,20.0\n").unwrap();
        let path = file.path().to_str().unwrap();

        let out = run_to_string(&["--file", path, "--aggregate", "price=max"]).unwrap();
        assert_eq!(out, "column  max\n------  ---\nprice    20\n");
    }

    #[test]
    fn stage_failure_is_an_error() {
        let err = run_to_string(&["--file", "tests/fixtures/products.csv", "--where", "name<5"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "filter failed: could not convert value to a number at row 1 column 'name' (raw='A')"
        );
    }
}
