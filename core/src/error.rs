// darkroom/src/error.rs

//! Error taxonomy for draft handling, pricing, storage and submission.
//!
//! Only [`ValidationError`] and authoritative-write failures prevent an order
//! from being created. Side-effect failures never surface as an error here; they
//! are recorded on the [`crate::submission::SubmissionReceipt`].

use crate::models::catalog::{Extra, PackageTier};
use crate::submission::SideChannel;
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// A draft failed one of its guard predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("choose a photo type")]
  PhotoTypeMissing,

  #[error("upload at least one file")]
  NoFiles,

  #[error("choose a package")]
  PackageMissing,

  #[error("upload a watermark file or deselect the watermark extra")]
  WatermarkMissing,

  #[error("accept the terms and conditions")]
  TermsNotAccepted,

  #[error("enter a contact email address")]
  ContactEmailMissing,

  #[error("the confirmation step has no further step")]
  FinalStep,
}

#[derive(Debug, Error)]
pub enum DraftError {
  #[error("draft is incomplete: {0}")]
  Validation(#[from] ValidationError),

  #[error("draft snapshot could not be read or written: {0}")]
  Snapshot(#[from] serde_json::Error),

  #[error("draft snapshot version {found} is not supported (expected at most {supported})")]
  UnsupportedSnapshotVersion { found: u32, supported: u32 },

  #[error("file index {index} is out of range for {len} files")]
  FileIndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
  #[error("no package selected")]
  PackageUnset,

  #[error("package '{0}' is not in the catalog")]
  UnknownPackage(PackageTier),

  #[error("add-on '{0}' is not in the catalog")]
  UnknownAddOn(Extra),

  #[error("coupon discount must be below 100 percent, got {0}")]
  InvalidCouponPercent(u8),

  #[error("order total exceeds the representable amount")]
  Overflow,
}

/// Failures reported by an [`crate::services::OrderStore`].
#[derive(Debug, Error)]
pub enum StoreError {
  /// The owner has no complete customer profile to attach the order to.
  #[error("customer profile is incomplete: {0}")]
  IncompleteProfile(String),

  #[error("order number {0} already exists")]
  Duplicate(String),

  #[error("order store failure: {0}")]
  Backend(#[from] AnyhowError),
}

/// Errors raised by the step runner itself rather than by a step handler.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Step already defined: {step_name}")]
  DuplicateStep { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

/// A best-effort channel failed after the order was written.
///
/// Only ever seen inside the submission pipeline, which records it on the
/// receipt instead of returning it.
#[derive(Debug, Error)]
#[error("{channel} failed: {source}")]
pub struct SideEffectError {
  pub channel: SideChannel,
  #[source]
  pub source: AnyhowError,
}

impl SideEffectError {
  pub fn new(channel: SideChannel, source: impl Into<AnyhowError>) -> Self {
    Self {
      channel,
      source: source.into(),
    }
  }
}

/// Everything that can stop an order from being created.
#[derive(Debug, Error)]
pub enum SubmissionError {
  #[error("draft is not ready for submission: {0}")]
  Validation(#[from] ValidationError),

  #[error("package '{0}' is not available")]
  UnknownPackage(PackageTier),

  #[error("price could not be computed: {0}")]
  Pricing(#[from] PricingError),

  /// The transactional insert failed; nothing was persisted.
  #[error("{message}")]
  AuthoritativeWrite {
    message: String,
    #[source]
    source: StoreError,
  },

  #[error("submission pipeline failed: {0}")]
  Pipeline(#[from] PipelineError),

  #[error(transparent)]
  SideEffect(#[from] SideEffectError),
}

impl SubmissionError {
  /// Builds the write error with a message the customer can act on.
  pub fn authoritative_write(source: StoreError) -> Self {
    let message = match &source {
      StoreError::IncompleteProfile(_) => {
        "Please complete your customer profile (name and company) before placing an order.".to_string()
      }
      _ => "We could not save your order. Please try again in a few minutes.".to_string(),
    };
    SubmissionError::AuthoritativeWrite { message, source }
  }

  /// Whether the failure came from the customer's input rather than the system.
  pub fn is_customer_fault(&self) -> bool {
    matches!(
      self,
      SubmissionError::Validation(_) | SubmissionError::UnknownPackage(_) | SubmissionError::Pricing(_)
    )
  }

  /// Text suitable for showing to the customer.
  pub fn customer_message(&self) -> String {
    match self {
      SubmissionError::AuthoritativeWrite { message, .. } => message.clone(),
      SubmissionError::Pipeline(_) | SubmissionError::SideEffect(_) => {
        "We could not process your order. Please try again.".to_string()
      }
      other => other.to_string(),
    }
  }
}
