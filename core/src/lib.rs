// darkroom/src/lib.rs

//! Darkroom: order intake and delivery scheduling for a photo-editing service.
//!
//! The crate covers the whole path from a customer's half-finished order to a
//! stored one:
//!  - [`draft`]: the step-by-step draft with derived price and validity.
//!  - [`pricing`]: unit counting for bracketed shoots, totals and the coupon.
//!  - [`submission`]: the pipeline that writes the order and then runs the
//!    best-effort side channels.
//!  - [`schedule`]: business-hours delivery estimates.
//!  - [`services`]: contracts for storage, mail and profiles, with in-memory
//!    implementations.

pub mod confirmation;
pub mod draft;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod pricing;
pub mod schedule;
pub mod services;
pub mod submission;

// --- Re-exports for the Public API ---

pub use crate::confirmation::ConfirmationView;
pub use crate::draft::{DraftInputs, DraftSnapshot, DraftStore, OrderDraft, WizardStep};
pub use crate::error::{
  DraftError, PipelineError, PricingError, SideEffectError, StoreError, SubmissionError,
  ValidationError,
};
pub use crate::models::{
  AssetRef, Catalog, CatalogEntry, Extra, Order, OrderAddOn, OrderRecord, PackageTier, PhotoType, SettlementMethod,
  StaticCatalog,
};
pub use crate::pricing::{compute_total_price, effective_unit_count, CouponPolicy, PriceBreakdown};
pub use crate::schedule::{calculate_eta, BusinessCalendar, ServiceTier};
pub use crate::submission::{
  Collaborators, SideChannel, SubmissionReceipt, SubmissionService, SubmissionSettings, SubmissionWarning,
};
