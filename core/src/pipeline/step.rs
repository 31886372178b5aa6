// darkroom/src/pipeline/step.rs

//! Step definitions and the handler type they run.

use super::context::ContextData;
use super::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// How a step's failure affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
  /// A failing handler aborts the run and its error is returned.
  Required,
  /// A failing handler is logged and recorded; later steps still run.
  BestEffort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub kind: StepKind,
}

/// A step handler. It receives a clone of the run's shared context and must not
/// hold a lock guard across an `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
