// darkroom/src/pipeline/mod.rs

//! A small runner for a fixed sequence of async steps over shared state.
//!
//! The submission pipeline is built on it: required steps up to and including
//! the authoritative write, best-effort steps for everything after.

pub mod context;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context::ContextData;
pub use control::{PipelineControl, PipelineOutcome, PipelineResult, StepFailure};
pub use definition::Pipeline;
pub use step::{Handler, StepDef, StepKind};
