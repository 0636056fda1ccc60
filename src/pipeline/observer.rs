//! Progress events from [`super::Pipeline::run`] and the observer hook that receives them.

use std::time::Duration;

use log::{debug, error, warn};

use crate::error::ProcessingError;

use super::Stage;

/// Events emitted by the pipeline driver.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    RunStarted { rows_in: usize },
    StageStarted { stage: Stage },
    StageWarning { stage: Stage, warning: ProcessingError },
    StageFinished {
        stage: Stage,
        rows_out: Option<usize>,
        elapsed: Duration,
    },
    StageFailed { stage: Stage, error: ProcessingError },
    RunFinished { elapsed: Duration },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards pipeline events to the `log` facade.
///
/// Warnings and failures are logged at `warn`/`error`; progress events at `debug`.
#[derive(Debug, Default)]
pub struct LogPipelineObserver;

impl PipelineObserver for LogPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageWarning { stage, warning } => warn!("[{stage}] {warning}"),
            PipelineEvent::StageFailed { stage, error } => error!("[{stage}] {error}"),
            PipelineEvent::StageFinished {
                stage,
                rows_out: Some(rows),
                elapsed,
            } => debug!("[{stage}] done rows_out={rows} elapsed={elapsed:?}"),
            other => debug!("{other:?}"),
        }
    }
}
