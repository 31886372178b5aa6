// darkroom/src/pipeline/definition.rs

//! Contains the `Pipeline<TData, Err>` struct and its construction.

use super::context::ContextData;
use super::control::PipelineControl;
use super::step::{Handler, StepDef, StepKind};
use crate::error::PipelineError;
use std::collections::HashMap;
use std::future::Future;
use tracing::{event, Level};

/// A fixed sequence of named steps over a shared context `TData`.
///
/// `Err` is the error type handlers return. It must absorb [`PipelineError`] so
/// that runner-level failures (e.g. a required step without a handler) surface
/// through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, kind)` pairs, in execution order.
  pub fn new(step_defs: &[(&str, StepKind)]) -> Result<Self, PipelineError> {
    let mut steps: Vec<StepDef> = Vec::with_capacity(step_defs.len());
    for (name, kind) in step_defs {
      if steps.iter().any(|s| s.name == *name) {
        return Err(PipelineError::DuplicateStep {
          step_name: (*name).to_string(),
        });
      }
      steps.push(StepDef {
        name: (*name).to_string(),
        kind: *kind,
      });
    }
    Ok(Self {
      steps,
      handlers: HashMap::new(),
    })
  }

  pub fn steps(&self) -> &[StepDef] {
    &self.steps
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name.as_str())
  }

  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order.
  pub fn on<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, PipelineError>
  where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      return Err(PipelineError::StepNotFound {
        step_name: step_name.to_string(),
      });
    }
    let final_handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self
      .handlers
      .entry(step_name.to_string())
      .or_default()
      .push(final_handler);
    event!(Level::DEBUG, %step_name, "Handler registered.");
    Ok(self)
  }
}
