// darkroom/src/draft/store.rs

//! The owned draft context handed to the wizard UI and, finally, to the
//! submission pipeline.

use super::{DraftInputs, OrderDraft, StepCursor, WizardStep};
use crate::error::{DraftError, ValidationError};
use crate::models::{AssetRef, Catalog, Extra, PackageTier, PhotoType};
use crate::pricing::CouponPolicy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{event, Level};

/// Emitted once per reset so funnel drop-off can be observed externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbandonmentSignal {
  pub furthest_step: WizardStep,
  pub abandoned_at: WizardStep,
  pub file_count: usize,
  pub package: Option<PackageTier>,
}

/// Receives abandonment signals.
pub trait FunnelObserver: Send + Sync {
  fn draft_abandoned(&self, signal: &AbandonmentSignal);
}

/// The persisted form of a draft: input fields only, never derived ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
  pub version: u32,
  pub inputs: DraftInputs,
}

impl DraftSnapshot {
  pub const CURRENT_VERSION: u32 = 1;
}

pub struct DraftStore {
  draft: OrderDraft,
  cursor: StepCursor,
  catalog: Arc<dyn Catalog>,
  coupon: Option<CouponPolicy>,
  observer: Option<Arc<dyn FunnelObserver>>,
}

impl DraftStore {
  pub fn new(catalog: Arc<dyn Catalog>, coupon: Option<CouponPolicy>) -> Self {
    let cursor = StepCursor::new();
    let draft = OrderDraft::derive(DraftInputs::default(), cursor.current(), catalog.as_ref(), coupon.as_ref());
    Self {
      draft,
      cursor,
      catalog,
      coupon,
      observer: None,
    }
  }

  pub fn with_observer(mut self, observer: Arc<dyn FunnelObserver>) -> Self {
    self.observer = Some(observer);
    self
  }

  pub fn draft(&self) -> &OrderDraft {
    &self.draft
  }

  pub fn current_step(&self) -> WizardStep {
    self.cursor.current()
  }

  pub fn furthest_step(&self) -> WizardStep {
    self.cursor.furthest()
  }

  // --- Mutations. Each one recomputes the derived fields before returning. ---

  pub fn set_photo_type(&mut self, photo_type: Option<PhotoType>) {
    self.mutate(|inputs| inputs.photo_type = photo_type);
  }

  pub fn add_file(&mut self, file: AssetRef) {
    self.mutate(|inputs| inputs.files.push(file));
  }

  pub fn remove_file(&mut self, index: usize) -> Result<AssetRef, DraftError> {
    let len = self.draft.inputs.files.len();
    if index >= len {
      return Err(DraftError::FileIndexOutOfRange { index, len });
    }
    Ok(self.mutate(|inputs| inputs.files.remove(index)))
  }

  /// Moves a file to a new position. Order matters for bracketed grouping.
  pub fn move_file(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
    let len = self.draft.inputs.files.len();
    for index in [from, to] {
      if index >= len {
        return Err(DraftError::FileIndexOutOfRange { index, len });
      }
    }
    self.mutate(|inputs| {
      let file = inputs.files.remove(from);
      inputs.files.insert(to, file);
    });
    Ok(())
  }

  pub fn clear_files(&mut self) {
    self.mutate(|inputs| inputs.files.clear());
  }

  pub fn set_package(&mut self, package: Option<PackageTier>) {
    self.mutate(|inputs| inputs.package = package);
  }

  /// Flips an extra on or off and returns whether it is now selected.
  pub fn toggle_extra(&mut self, extra: Extra) -> bool {
    self.mutate(|inputs| {
      if inputs.extras.remove(&extra) {
        false
      } else {
        inputs.extras.insert(extra);
        true
      }
    })
  }

  pub fn set_extra(&mut self, extra: Extra, selected: bool) {
    self.mutate(|inputs| {
      if selected {
        inputs.extras.insert(extra);
      } else {
        inputs.extras.remove(&extra);
      }
    });
  }

  pub fn set_watermark_asset(&mut self, asset: Option<AssetRef>) {
    self.mutate(|inputs| inputs.watermark_asset = asset);
  }

  pub fn set_contact_email(&mut self, email: impl Into<String>) {
    let email = email.into();
    self.mutate(|inputs| inputs.contact_email = email);
  }

  pub fn set_company_name(&mut self, company: impl Into<String>) {
    let company = company.into();
    self.mutate(|inputs| inputs.company_name = company);
  }

  pub fn set_object_reference(&mut self, reference: impl Into<String>) {
    let reference = reference.into();
    self.mutate(|inputs| inputs.object_reference = reference);
  }

  pub fn set_special_requests(&mut self, requests: impl Into<String>) {
    let requests = requests.into();
    self.mutate(|inputs| inputs.special_requests = requests);
  }

  pub fn set_terms_accepted(&mut self, accepted: bool) {
    self.mutate(|inputs| inputs.terms_accepted = accepted);
  }

  pub fn set_coupon_code(&mut self, code: Option<String>) {
    self.mutate(|inputs| inputs.coupon_code = code);
  }

  // --- Step cursor ---

  /// Moves forward if the current step's guard holds.
  pub fn advance(&mut self) -> Result<WizardStep, DraftError> {
    let current = self.cursor.current();
    if let Err(unmet) = self.draft.inputs.step_guard(current) {
      event!(Level::DEBUG, step = %current, guard = %unmet, "Step guard not satisfied.");
      return Err(unmet.into());
    }
    let next = self.cursor.forward().ok_or(ValidationError::FinalStep)?;
    self.recompute();
    event!(Level::DEBUG, from = %current, to = %next, "Draft advanced.");
    Ok(next)
  }

  pub fn back(&mut self) -> WizardStep {
    let step = self.cursor.backward();
    self.recompute();
    step
  }

  // --- Persistence boundary ---

  pub fn snapshot(&self) -> DraftSnapshot {
    DraftSnapshot {
      version: DraftSnapshot::CURRENT_VERSION,
      inputs: self.draft.inputs.clone(),
    }
  }

  pub fn serialize(&self) -> Result<String, DraftError> {
    Ok(serde_json::to_string(&self.snapshot())?)
  }

  /// Rebuilds a store from JSON produced by [`DraftStore::serialize`].
  pub fn restore(json: &str, catalog: Arc<dyn Catalog>, coupon: Option<CouponPolicy>) -> Result<Self, DraftError> {
    let snapshot: DraftSnapshot = serde_json::from_str(json)?;
    Self::from_snapshot(snapshot, catalog, coupon)
  }

  /// Rebuilds a store from a snapshot. The cursor resumes at the first step
  /// whose guard is unmet, never beyond the summary.
  pub fn from_snapshot(
    snapshot: DraftSnapshot,
    catalog: Arc<dyn Catalog>,
    coupon: Option<CouponPolicy>,
  ) -> Result<Self, DraftError> {
    if snapshot.version == 0 || snapshot.version > DraftSnapshot::CURRENT_VERSION {
      return Err(DraftError::UnsupportedSnapshotVersion {
        found: snapshot.version,
        supported: DraftSnapshot::CURRENT_VERSION,
      });
    }

    let inputs = snapshot.inputs;
    let resume_at = WizardStep::ALL
      .into_iter()
      .take_while(|step| *step < WizardStep::Summary)
      .find(|step| inputs.step_guard(*step).is_err())
      .unwrap_or(WizardStep::Summary);

    let cursor = StepCursor::at(resume_at);
    let draft = OrderDraft::derive(inputs, cursor.current(), catalog.as_ref(), coupon.as_ref());
    event!(Level::DEBUG, resume_at = %resume_at, "Draft restored from snapshot.");
    Ok(Self {
      draft,
      cursor,
      catalog,
      coupon,
      observer: None,
    })
  }

  // --- Lifecycle ---

  /// Clears everything and reports how far the customer got.
  pub fn reset(&mut self) -> AbandonmentSignal {
    let signal = AbandonmentSignal {
      furthest_step: self.cursor.furthest(),
      abandoned_at: self.cursor.current(),
      file_count: self.draft.inputs.files.len(),
      package: self.draft.inputs.package,
    };
    event!(
      Level::INFO,
      furthest_step = %signal.furthest_step,
      abandoned_at = %signal.abandoned_at,
      file_count = signal.file_count,
      "Draft abandoned."
    );
    if let Some(observer) = &self.observer {
      observer.draft_abandoned(&signal);
    }
    self.clear();
    signal
  }

  /// Discards the draft after a successful submission. No abandonment signal.
  pub fn finish(&mut self) {
    self.clear();
  }

  fn clear(&mut self) {
    self.cursor = StepCursor::new();
    self.draft.inputs = DraftInputs::default();
    self.recompute();
  }

  fn mutate<R>(&mut self, apply: impl FnOnce(&mut DraftInputs) -> R) -> R {
    let result = apply(&mut self.draft.inputs);
    self.recompute();
    result
  }

  fn recompute(&mut self) {
    let inputs = std::mem::take(&mut self.draft.inputs);
    self.draft = OrderDraft::derive(inputs, self.cursor.current(), self.catalog.as_ref(), self.coupon.as_ref());
  }
}
