//! Pipeline driver: runs the processing stages over a loaded [`DataSet`] in a fixed order.
//!
//! ```text
//! filter? -> sort? -> aggregate? (terminal) -> head? (only without aggregate)
//! ```
//!
//! Each stage runs only if its option is set. A fatal stage error aborts the run and nothing is
//! returned but the [`PipelineError`]; recoverable inputs (an unknown filter operator, an unknown
//! sort direction) let the stage pass its input through and are collected as warnings.
//!
//! Aggregation sees the filtered and sorted rows, not the raw input.
//!
//! ```rust
//! use csv_cruncher::pipeline::{run, PipelineOptions, PipelineResult};
//! use csv_cruncher::types::{DataSet, Row, Schema};
//!
//! let ds = DataSet::new(
//!     Schema::new(["name", "qty"]),
//!     vec![Row::new(["a", "2"]), Row::new(["b", "5"]), Row::new(["c", "10"])],
//! );
//! let opts = PipelineOptions {
//!     filter: Some("qty>2".to_string()),
//!     sort: Some("qty=desc".to_string()),
//!     limit: Some(1),
//!     ..Default::default()
//! };
//!
//! let out = run(&ds, &opts).unwrap();
//! match out.result {
//!     PipelineResult::Rows(rows) => assert_eq!(rows.value(0, "name"), Some("c")),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{PipelineError, ProcessingError, ProcessingResult};
use crate::processing::{aggregate_with, filter, head, sort, AggregateResult, AggregateSpec, StageOutput};
use crate::types::DataSet;

pub use observer::{LogPipelineObserver, PipelineEvent, PipelineObserver};

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Filter,
    Sort,
    Aggregate,
    Limit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Filter => "filter",
            Stage::Sort => "sort",
            Stage::Aggregate => "aggregate",
            Stage::Limit => "head",
        })
    }
}

/// Which stages to run and with what arguments. Use [`Default`] for "no stages".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Filter condition, e.g. `price<15`.
    pub filter: Option<String>,
    /// Sort spec, e.g. `price=desc`.
    pub sort: Option<String>,
    /// Aggregate spec, e.g. `price=avg`. When set, the run ends with an aggregate result.
    pub aggregate: Option<String>,
    /// Maximum number of rows to keep. Ignored when `aggregate` is set.
    pub limit: Option<usize>,
}

/// A recoverable problem that turned a stage into a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct StageWarning {
    pub stage: Stage,
    pub warning: ProcessingError,
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} skipped: {}", self.stage, self.warning)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// The input dataset was empty; no stage ran.
    NoData,
    /// Tabular output of the filter/sort/head stages.
    Rows(DataSet),
    /// Output of the terminal aggregate stage.
    Aggregate(AggregateResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub result: PipelineResult,
    pub warnings: Vec<StageWarning>,
}

/// Runs [`PipelineOptions`] over datasets, reporting progress to an optional observer.
#[derive(Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            observer: None,
        }
    }

    /// Attach an observer for stage events.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the configured stages over `dataset`.
    pub fn run(&self, dataset: &DataSet) -> Result<PipelineOutput, PipelineError> {
        let start = Instant::now();
        self.emit(PipelineEvent::RunStarted {
            rows_in: dataset.row_count(),
        });

        let result = self.run_stages(dataset);

        self.emit(PipelineEvent::RunFinished {
            elapsed: start.elapsed(),
        });
        result
    }

    fn run_stages(&self, dataset: &DataSet) -> Result<PipelineOutput, PipelineError> {
        let mut warnings = Vec::new();
        if dataset.is_empty() {
            return Ok(PipelineOutput {
                result: PipelineResult::NoData,
                warnings,
            });
        }

        let mut current = dataset.clone();

        if let Some(condition) = &self.options.filter {
            let out = self.run_stage(Stage::Filter, || filter(&current, condition))?;
            current = self.take_output(Stage::Filter, out, &mut warnings);
        }

        if let Some(spec) = &self.options.sort {
            let out = self.run_stage(Stage::Sort, || sort(&current, spec))?;
            current = self.take_output(Stage::Sort, out, &mut warnings);
        }

        if let Some(spec) = &self.options.aggregate {
            let agg = self.run_stage(Stage::Aggregate, || {
                let spec = AggregateSpec::parse(spec)?;
                aggregate_with(&current, &spec.column, spec.op)
            })?;
            return Ok(PipelineOutput {
                result: PipelineResult::Aggregate(agg),
                warnings,
            });
        }

        if let Some(n) = self.options.limit {
            current = self.run_stage(Stage::Limit, || Ok(head(&current, n)))?;
        }

        Ok(PipelineOutput {
            result: PipelineResult::Rows(current),
            warnings,
        })
    }

    fn run_stage<T, F>(&self, stage: Stage, f: F) -> Result<T, PipelineError>
    where
        T: StageRows,
        F: FnOnce() -> ProcessingResult<T>,
    {
        let start = Instant::now();
        self.emit(PipelineEvent::StageStarted { stage });
        match f() {
            Ok(out) => {
                self.emit(PipelineEvent::StageFinished {
                    stage,
                    rows_out: out.rows_out(),
                    elapsed: start.elapsed(),
                });
                Ok(out)
            }
            Err(error) => {
                self.emit(PipelineEvent::StageFailed {
                    stage,
                    error: error.clone(),
                });
                Err(PipelineError { stage, error })
            }
        }
    }

    fn take_output(&self, stage: Stage, out: StageOutput, warnings: &mut Vec<StageWarning>) -> DataSet {
        if let Some(warning) = out.warning {
            self.emit(PipelineEvent::StageWarning {
                stage,
                warning: warning.clone(),
            });
            warnings.push(StageWarning { stage, warning });
        }
        out.dataset
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Run `options` over `dataset` without an observer.
pub fn run(dataset: &DataSet, options: &PipelineOptions) -> Result<PipelineOutput, PipelineError> {
    Pipeline::new(options.clone()).run(dataset)
}

/// Row count reported in [`PipelineEvent::StageFinished`].
trait StageRows {
    fn rows_out(&self) -> Option<usize>;
}

impl StageRows for DataSet {
    fn rows_out(&self) -> Option<usize> {
        Some(self.row_count())
    }
}

impl StageRows for StageOutput {
    fn rows_out(&self) -> Option<usize> {
        Some(self.dataset.row_count())
    }
}

impl StageRows for AggregateResult {
    fn rows_out(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{run, Pipeline, PipelineEvent, PipelineObserver, PipelineOptions, PipelineResult, Stage};
    use crate::error::ProcessingError;
    use crate::processing::AggregateValue;
    use crate::types::{DataSet, Row, Schema};

    fn sample_dataset() -> DataSet {
        DataSet::new(
            Schema::new(["id", "name", "price", "qty"]),
            vec![
                Row::new(["1", "A", "10.5", "2"]),
                Row::new(["2", "B", "20.0", "5"]),
                Row::new(["3", "C", "15.0", "1"]),
                Row::new(["4", "A", "5.0", "10"]),
            ],
        )
    }

    fn rows(result: PipelineResult) -> DataSet {
        match result {
            PipelineResult::Rows(ds) => ds,
            other => panic!("expected rows, got {other:?}"),
        }
    }

    fn ids(ds: &DataSet) -> Vec<&str> {
        ds.column_values("id").unwrap().collect()
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<PipelineEvent>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_event(&self, event: &PipelineEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn no_options_returns_input_unchanged() {
        let ds = sample_dataset();
        let out = run(&ds, &PipelineOptions::default()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(rows(out.result), ds);
    }

    #[test]
    fn empty_dataset_is_no_data_without_running_stages() {
        let ds = sample_dataset().with_rows(Vec::new());
        let opts = PipelineOptions {
            aggregate: Some("notacol=sum".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&ds, &opts).unwrap().result, PipelineResult::NoData);
    }

    #[test]
    fn filter_then_sort_then_head() {
        let ds = sample_dataset();
        let opts = PipelineOptions {
            filter: Some("qty>1".to_string()),
            sort: Some("price=desc".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let out = rows(run(&ds, &opts).unwrap().result);
        assert_eq!(ids(&out), vec!["2", "1"]);
    }

    #[test]
    fn aggregate_runs_on_filtered_rows_and_skips_head() {
        let ds = sample_dataset();
        let opts = PipelineOptions {
            filter: Some("name=A".to_string()),
            aggregate: Some("price=avg".to_string()),
            limit: Some(0),
            ..Default::default()
        };
        match run(&ds, &opts).unwrap().result {
            PipelineResult::Aggregate(agg) => {
                assert_eq!(agg.column, "price");
                assert_eq!(agg.value, AggregateValue::Avg(7.75));
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn warnings_are_collected_and_stages_pass_through() {
        let ds = sample_dataset();
        let opts = PipelineOptions {
            filter: Some("price".to_string()),
            sort: Some("qty=sideways".to_string()),
            ..Default::default()
        };
        let out = run(&ds, &opts).unwrap();
        assert_eq!(rows(out.result), ds);
        let stages: Vec<Stage> = out.warnings.iter().map(|w| w.stage).collect();
        assert_eq!(stages, vec![Stage::Filter, Stage::Sort]);
        assert_eq!(
            out.warnings[1].to_string(),
            "sort skipped: unknown sort direction 'sideways' (expected asc or desc)"
        );
    }

    #[test]
    fn fatal_error_aborts_and_names_the_stage() {
        let ds = sample_dataset();
        let opts = PipelineOptions {
            filter: Some("qty>1".to_string()),
            aggregate: Some("qty=sum".to_string()),
            ..Default::default()
        };
        let err = run(&ds, &opts).unwrap_err();
        assert_eq!(err.stage, Stage::Aggregate);
        assert_eq!(
            err.error,
            ProcessingError::UnsupportedAggregateOp {
                op: "sum".to_string()
            }
        );
        assert!(err.to_string().starts_with("aggregate failed: "));
    }

    #[test]
    fn sort_error_stops_before_aggregate() {
        let ds = sample_dataset();
        let opts = PipelineOptions {
            sort: Some("weight=asc".to_string()),
            aggregate: Some("qty=max".to_string()),
            ..Default::default()
        };
        let err = run(&ds, &opts).unwrap_err();
        assert_eq!(err.stage, Stage::Sort);
    }

    #[test]
    fn observer_sees_stage_lifecycle() {
        let ds = sample_dataset();
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = Pipeline::new(PipelineOptions {
            filter: Some("oops".to_string()),
            limit: Some(1),
            ..Default::default()
        })
        .with_observer(observer.clone());

        pipeline.run(&ds).unwrap();

        let events = observer.events.lock().unwrap();
        assert!(matches!(events[0], PipelineEvent::RunStarted { rows_in: 4 }));
        assert!(matches!(
            events[1],
            PipelineEvent::StageStarted {
                stage: Stage::Filter
            }
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::StageWarning {
                stage: Stage::Filter,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::StageFinished {
                stage: Stage::Limit,
                rows_out: Some(1),
                ..
            }
        )));
        assert!(matches!(events.last(), Some(PipelineEvent::RunFinished { .. })));
    }
}
