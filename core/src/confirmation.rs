// darkroom/src/confirmation.rs

//! What the customer sees after submitting.
//!
//! Built only from fields frozen on the stored order. The catalog is never
//! consulted, so later price or name changes do not alter a confirmation.

use crate::models::{Order, OrderAddOn, OrderStatus, PaymentFlowStatus, PhotoType, SettlementMethod};
use crate::pricing::format_cents;
use crate::schedule::BusinessCalendar;
use crate::submission::SubmissionReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationView {
  pub order_number: String,
  pub package: String,
  pub photo_type: PhotoType,
  pub photo_type_label: String,
  pub file_count: u32,
  pub unit_count: u32,
  pub extras: Vec<String>,
  pub express: bool,
  pub eta: DateTime<Utc>,
  pub subtotal_cents: u64,
  pub discount_cents: u64,
  pub total_price_cents: u64,
  pub total_price: String,
  pub settlement_method: SettlementMethod,
  pub status: OrderStatus,
  pub payment_flow_status: PaymentFlowStatus,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub notices: Vec<String>,
}

impl ConfirmationView {
  /// The ETA is recomputed from the frozen creation time and express flag, so
  /// it matches what the pipeline promised.
  pub fn from_order(order: &Order, add_ons: &[OrderAddOn], calendar: &BusinessCalendar) -> Self {
    Self {
      order_number: order.order_number.clone(),
      package: order.package_name.clone(),
      photo_type: order.photo_type,
      photo_type_label: order.photo_type.label().to_string(),
      file_count: order.file_count,
      unit_count: order.image_count,
      extras: add_ons.iter().map(|a| a.name.clone()).collect(),
      express: order.express,
      eta: calendar.calculate_eta(order.created_at, order.express),
      subtotal_cents: order.subtotal_cents,
      discount_cents: order.discount_cents,
      total_price_cents: order.total_price_cents,
      total_price: format_cents(order.total_price_cents),
      settlement_method: order.settlement_method,
      status: order.status,
      payment_flow_status: order.payment_flow_status,
      notices: Vec::new(),
    }
  }

  pub fn from_receipt(receipt: &SubmissionReceipt, calendar: &BusinessCalendar) -> Self {
    let mut view = Self::from_order(&receipt.order, &receipt.add_ons, calendar).with_notices(receipt.customer_notices());
    view.eta = receipt.eta;
    view
  }

  pub fn with_notices(mut self, notices: Vec<String>) -> Self {
    self.notices = notices;
    self
  }
}
