// darkroom/src/submission/context.rs

//! Shared state threaded through the submission steps.

use super::SubmissionWarning;
use crate::draft::DraftInputs;
use crate::models::{CatalogEntry, Extra, Order, OrderAddOn, SettlementMethod, UploadedAsset};
use crate::pricing::PriceBreakdown;
use crate::services::Caller;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct SubmissionCtxData {
  // Inputs
  pub inputs: DraftInputs,
  pub settlement: SettlementMethod,
  pub caller: Caller,
  pub created_at: DateTime<Utc>,

  // Filled by the required steps
  pub package_entry: Option<CatalogEntry>,
  pub add_on_entries: Vec<(Extra, CatalogEntry)>,
  pub price: Option<PriceBreakdown>,
  pub order: Option<Order>,
  pub add_ons: Vec<OrderAddOn>,
  pub eta: Option<DateTime<Utc>>,
  pub persisted: bool,

  // Filled by the side-effect steps
  pub uploaded_assets: Vec<UploadedAsset>,
  pub warnings: Vec<SubmissionWarning>,
  pub confirmation_message_id: Option<String>,
  pub staff_message_id: Option<String>,
}

impl SubmissionCtxData {
  pub fn new(inputs: DraftInputs, settlement: SettlementMethod, caller: Caller, created_at: DateTime<Utc>) -> Self {
    Self {
      inputs,
      settlement,
      caller,
      created_at,
      package_entry: None,
      add_on_entries: Vec::new(),
      price: None,
      order: None,
      add_ons: Vec::new(),
      eta: None,
      persisted: false,
      uploaded_assets: Vec::new(),
      warnings: Vec::new(),
      confirmation_message_id: None,
      staff_message_id: None,
    }
  }
}
