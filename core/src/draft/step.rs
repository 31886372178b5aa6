// darkroom/src/draft/step.rs

//! The fixed order wizard sequence and a cursor over it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of the order wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
  PhotoType,
  Upload,
  Package,
  Extras,
  Summary,
  Confirmation,
}

impl WizardStep {
  pub const ALL: [WizardStep; 6] = [
    WizardStep::PhotoType,
    WizardStep::Upload,
    WizardStep::Package,
    WizardStep::Extras,
    WizardStep::Summary,
    WizardStep::Confirmation,
  ];

  pub fn first() -> Self {
    WizardStep::PhotoType
  }

  pub fn index(self) -> usize {
    self as usize
  }

  pub fn next(self) -> Option<Self> {
    Self::ALL.get(self.index() + 1).copied()
  }

  pub fn previous(self) -> Option<Self> {
    self.index().checked_sub(1).map(|idx| Self::ALL[idx])
  }

  pub fn as_str(self) -> &'static str {
    match self {
      WizardStep::PhotoType => "photo-type",
      WizardStep::Upload => "upload",
      WizardStep::Package => "package",
      WizardStep::Extras => "extras",
      WizardStep::Summary => "summary",
      WizardStep::Confirmation => "confirmation",
    }
  }
}

impl fmt::Display for WizardStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Current position in the wizard plus the furthest step ever reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
  current: WizardStep,
  furthest: WizardStep,
}

impl StepCursor {
  pub fn new() -> Self {
    Self::at(WizardStep::first())
  }

  pub(crate) fn at(step: WizardStep) -> Self {
    Self {
      current: step,
      furthest: step,
    }
  }

  pub fn current(&self) -> WizardStep {
    self.current
  }

  pub fn furthest(&self) -> WizardStep {
    self.furthest
  }

  /// Moves one step forward. The caller has already checked the guard.
  pub(crate) fn forward(&mut self) -> Option<WizardStep> {
    let next = self.current.next()?;
    self.current = next;
    self.furthest = self.furthest.max(next);
    Some(next)
  }

  pub(crate) fn backward(&mut self) -> WizardStep {
    self.current = match self.current {
      WizardStep::Confirmation => WizardStep::Summary,
      other => other.previous().unwrap_or(other),
    };
    self.current
  }
}

impl Default for StepCursor {
  fn default() -> Self {
    Self::new()
  }
}
