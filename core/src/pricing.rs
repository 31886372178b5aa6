// darkroom/src/pricing.rs

//! Billable unit counts and order totals.
//!
//! Everything here is pure. The submission pipeline calls the same functions the
//! draft store uses for display, so the persisted total never depends on what a
//! client last rendered.

use crate::draft::DraftInputs;
use crate::error::PricingError;
use crate::models::{Catalog, PhotoType};
use serde::{Deserialize, Serialize};

/// Billable images for an ordered file list.
///
/// Bracketed modes bill one unit per group of exposures and round a partial
/// trailing group up to a full unit. All other modes, including an unset photo
/// type, bill every file.
pub fn effective_unit_count<F>(files: &[F], photo_type: Option<PhotoType>) -> u32 {
  let units = match photo_type.and_then(PhotoType::group_size) {
    Some(group_size) => files.len().div_ceil(group_size),
    None => files.len(),
  };
  u32::try_from(units).unwrap_or(u32::MAX)
}

/// A percentage discount unlocked by one fixed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponPolicy {
  code: String,
  percent_off: u8,
}

impl CouponPolicy {
  pub fn new(code: impl Into<String>, percent_off: u8) -> Result<Self, PricingError> {
    // A full discount would make every total zero regardless of quantity.
    if percent_off >= 100 {
      return Err(PricingError::InvalidCouponPercent(percent_off));
    }
    Ok(Self {
      code: code.into().trim().to_string(),
      percent_off,
    })
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn percent_off(&self) -> u8 {
    self.percent_off
  }

  /// Case-insensitive match after trimming.
  pub fn matches(&self, candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty() && candidate.eq_ignore_ascii_case(&self.code)
  }

  fn discount_on(&self, subtotal_cents: u64) -> u64 {
    // u128 keeps the intermediate product exact.
    let discount = u128::from(subtotal_cents) * u128::from(self.percent_off) / 100;
    u64::try_from(discount).unwrap_or(subtotal_cents)
  }
}

impl Default for CouponPolicy {
  fn default() -> Self {
    Self {
      code: "DARKROOM10".to_string(),
      percent_off: 10,
    }
  }
}

/// Result of pricing a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
  /// Package price plus every selected add-on, per billable unit.
  pub unit_price_cents: u64,
  pub unit_count: u32,
  pub subtotal_cents: u64,
  pub discount_cents: u64,
  pub total_cents: u64,
  pub coupon_applied: bool,
}

/// Prices the draft against the catalog.
///
/// `(package + Σ add-ons) × units`, minus the coupon percentage taken from that
/// subtotal when the draft carries the coupon's code.
pub fn compute_total_price(
  draft: &DraftInputs,
  catalog: &dyn Catalog,
  coupon: Option<&CouponPolicy>,
) -> Result<PriceBreakdown, PricingError> {
  let tier = draft.package.ok_or(PricingError::PackageUnset)?;
  let package = catalog.package(tier).ok_or(PricingError::UnknownPackage(tier))?;

  let mut unit_price_cents = package.unit_price_cents;
  for extra in &draft.extras {
    let add_on = catalog.add_on(*extra).ok_or(PricingError::UnknownAddOn(*extra))?;
    unit_price_cents = unit_price_cents
      .checked_add(add_on.unit_price_cents)
      .ok_or(PricingError::Overflow)?;
  }

  let unit_count = effective_unit_count(&draft.files, draft.photo_type);
  let subtotal_cents = unit_price_cents
    .checked_mul(u64::from(unit_count))
    .ok_or(PricingError::Overflow)?;

  let applied = coupon.filter(|policy| draft.coupon_code.as_deref().is_some_and(|code| policy.matches(code)));
  let discount_cents = applied.map_or(0, |policy| policy.discount_on(subtotal_cents));

  Ok(PriceBreakdown {
    unit_price_cents,
    unit_count,
    subtotal_cents,
    discount_cents,
    total_cents: subtotal_cents.saturating_sub(discount_cents),
    coupon_applied: applied.is_some(),
  })
}

/// Formats cents as `12.34`.
pub fn format_cents(cents: u64) -> String {
  format!("{}.{:02}", cents / 100, cents % 100)
}
