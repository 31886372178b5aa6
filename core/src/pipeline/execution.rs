// darkroom/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which executes the steps in order.

use super::context::ContextData;
use super::control::{PipelineControl, PipelineOutcome, PipelineResult, StepFailure};
use super::definition::Pipeline;
use super::step::StepKind;
use crate::error::PipelineError;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// A required step's error ends the run and is returned. A best-effort step's
  /// error is logged, recorded in [`PipelineOutcome::failures`], and the run moves
  /// on to the next step.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineOutcome, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");
    let mut failures = Vec::new();

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name,
        step_index = step_idx,
        kind = ?step_def.kind
      );

      let handlers = match self.handlers.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ => match step_def.kind {
          StepKind::BestEffort => {
            event!(parent: &step_span, Level::DEBUG, "Best-effort step has no handlers, skipping.");
            continue;
          }
          StepKind::Required => {
            event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
            return Err(Err::from(PipelineError::HandlerMissing {
              step_name: step_def.name.clone(),
            }));
          }
        },
      };

      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        let handler_span = span!(parent: &step_span, Level::DEBUG, "step_handler", handler_index = handler_idx);
        match handler_fn(ctx_data.clone()).instrument(handler_span).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(parent: &step_span, Level::INFO, "Pipeline stopped by a handler.");
            return Ok(PipelineOutcome {
              result: PipelineResult::Stopped,
              failures,
            });
          }
          Err(e) => match step_def.kind {
            StepKind::Required => {
              event!(parent: &step_span, Level::ERROR, error = %e, "Required step failed.");
              return Err(e);
            }
            StepKind::BestEffort => {
              event!(parent: &step_span, Level::WARN, error = %e, "Best-effort step failed; continuing.");
              failures.push(StepFailure {
                step_name: step_def.name.clone(),
                message: e.to_string(),
              });
              // Remaining handlers of a failed step are skipped.
              break;
            }
          },
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step processing finished.");
    }

    event!(Level::DEBUG, failed_steps = failures.len(), "Pipeline execution completed.");
    Ok(PipelineOutcome {
      result: PipelineResult::Completed,
      failures,
    })
  }
}
