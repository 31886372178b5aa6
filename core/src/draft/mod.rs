// darkroom/src/draft/mod.rs

//! The in-progress order a customer builds step by step.
//!
//! [`DraftInputs`] holds only what the customer entered and is the unit of
//! persistence. [`OrderDraft`] pairs those inputs with fields derived from them,
//! which are recomputed by the [`DraftStore`] after every mutation and are never
//! read back from storage.

pub mod step;
pub mod store;

pub use step::{StepCursor, WizardStep};
pub use store::{AbandonmentSignal, DraftSnapshot, DraftStore, FunnelObserver};

use crate::error::ValidationError;
use crate::models::{AssetRef, Catalog, Extra, PackageTier, PhotoType};
use crate::pricing::{self, CouponPolicy, PriceBreakdown};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Customer-entered draft fields. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftInputs {
  pub photo_type: Option<PhotoType>,
  pub files: Vec<AssetRef>,
  pub package: Option<PackageTier>,
  pub extras: BTreeSet<Extra>,
  pub watermark_asset: Option<AssetRef>,
  pub contact_email: String,
  pub company_name: String,
  pub object_reference: String,
  pub special_requests: String,
  pub terms_accepted: bool,
  pub coupon_code: Option<String>,
}

impl DraftInputs {
  pub fn has_contact_email(&self) -> bool {
    !self.contact_email.trim().is_empty()
  }

  pub fn is_express(&self) -> bool {
    self.extras.contains(&Extra::Express)
  }

  /// Guard for moving forward from `step`.
  pub fn step_guard(&self, step: WizardStep) -> Result<(), ValidationError> {
    match step {
      WizardStep::PhotoType => self.require_photo_type(),
      WizardStep::Upload => self.require_files(),
      WizardStep::Package => self.require_package(),
      WizardStep::Extras => self.require_watermark(),
      WizardStep::Summary => {
        self.require_package()?;
        self.require_files()?;
        self.require_terms()?;
        if !self.has_contact_email() {
          return Err(ValidationError::ContactEmailMissing);
        }
        Ok(())
      }
      WizardStep::Confirmation => Err(ValidationError::FinalStep),
    }
  }

  /// What the submission pipeline insists on before writing anything.
  ///
  /// A missing contact email is tolerated here: the order is still created and
  /// the confirmation email is skipped with a warning.
  pub fn submission_guard(&self) -> Result<(), ValidationError> {
    self.require_photo_type()?;
    self.require_files()?;
    self.require_package()?;
    self.require_watermark()?;
    self.require_terms()
  }

  fn require_photo_type(&self) -> Result<(), ValidationError> {
    self.photo_type.map(|_| ()).ok_or(ValidationError::PhotoTypeMissing)
  }

  fn require_files(&self) -> Result<(), ValidationError> {
    if self.files.is_empty() {
      return Err(ValidationError::NoFiles);
    }
    Ok(())
  }

  fn require_package(&self) -> Result<(), ValidationError> {
    self.package.map(|_| ()).ok_or(ValidationError::PackageMissing)
  }

  fn require_watermark(&self) -> Result<(), ValidationError> {
    if self.extras.contains(&Extra::Watermark) && self.watermark_asset.is_none() {
      return Err(ValidationError::WatermarkMissing);
    }
    Ok(())
  }

  fn require_terms(&self) -> Result<(), ValidationError> {
    if !self.terms_accepted {
      return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
  }
}

/// Draft inputs plus their derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
  inputs: DraftInputs,
  effective_unit_count: u32,
  is_valid: bool,
  price: Option<PriceBreakdown>,
}

impl OrderDraft {
  /// Derives every computed field from `inputs` as seen from `step`.
  pub(crate) fn derive(
    inputs: DraftInputs,
    step: WizardStep,
    catalog: &dyn Catalog,
    coupon: Option<&CouponPolicy>,
  ) -> Self {
    let effective_unit_count = pricing::effective_unit_count(&inputs.files, inputs.photo_type);
    let mut is_valid = inputs.package.is_some() && !inputs.files.is_empty();
    if step >= WizardStep::Summary {
      is_valid = is_valid && inputs.terms_accepted && inputs.has_contact_email();
    }
    // A missing package simply means there is nothing to price yet.
    let price = pricing::compute_total_price(&inputs, catalog, coupon).ok();
    Self {
      inputs,
      effective_unit_count,
      is_valid,
      price,
    }
  }

  pub fn inputs(&self) -> &DraftInputs {
    &self.inputs
  }

  pub fn effective_unit_count(&self) -> u32 {
    self.effective_unit_count
  }

  pub fn is_valid(&self) -> bool {
    self.is_valid
  }

  /// Display price, `None` until a package is chosen.
  pub fn price(&self) -> Option<&PriceBreakdown> {
    self.price.as_ref()
  }

  pub fn photo_type(&self) -> Option<PhotoType> {
    self.inputs.photo_type
  }

  pub fn files(&self) -> &[AssetRef] {
    &self.inputs.files
  }

  pub fn package(&self) -> Option<PackageTier> {
    self.inputs.package
  }

  pub fn extras(&self) -> &BTreeSet<Extra> {
    &self.inputs.extras
  }
}
