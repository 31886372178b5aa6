// darkroom/src/pipeline/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Signal from a handler indicating whether the pipeline should continue or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the run. No further handlers or steps execute.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}

/// A best-effort step whose handler failed. The run carried on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
  pub step_name: String,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
  pub result: PipelineResult,
  pub failures: Vec<StepFailure>,
}

impl PipelineOutcome {
  pub fn is_degraded(&self) -> bool {
    !self.failures.is_empty()
  }

  pub fn failed(&self, step_name: &str) -> bool {
    self.failures.iter().any(|f| f.step_name == step_name)
  }
}
