// darkroom/src/models/order.rs

use crate::models::asset::PhotoType;
use crate::models::catalog::{Extra, PackageTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Received,
  InProgress,
  Delivered,
  Cancelled,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMethod {
  Card,
  Invoice,
  OnAccount,
}

impl SettlementMethod {
  /// Where the payment flow starts for a freshly created order.
  pub fn initial_payment_flow(self) -> PaymentFlowStatus {
    match self {
      SettlementMethod::Card => PaymentFlowStatus::AwaitingGateway,
      SettlementMethod::Invoice => PaymentFlowStatus::InvoiceIssued,
      SettlementMethod::OnAccount => PaymentFlowStatus::NotRequired,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFlowStatus {
  AwaitingGateway,
  InvoiceIssued,
  NotRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
}

/// How uploaded exposures were grouped into billable images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketingInfo {
  pub exposures_per_group: u32,
  pub group_count: u32,
  /// Size of the last group when it is shorter than `exposures_per_group`.
  pub trailing_group_size: Option<u32>,
}

impl BracketingInfo {
  pub fn for_files(photo_type: PhotoType, file_count: usize) -> Option<Self> {
    let group_size = photo_type.group_size()?;
    let remainder = file_count % group_size;
    Some(Self {
      exposures_per_group: u32::try_from(group_size).unwrap_or(u32::MAX),
      group_count: u32::try_from(file_count.div_ceil(group_size)).unwrap_or(u32::MAX),
      trailing_group_size: (remainder != 0).then(|| u32::try_from(remainder).unwrap_or(u32::MAX)),
    })
  }
}

/// The authoritative order row.
///
/// Counts, prices, package and photo type are frozen at creation; only
/// `status` and `payment_status` change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub order_number: String,
  pub owner_id: Uuid,
  pub package: PackageTier,
  pub package_name: String,
  pub package_unit_price_cents: u64,
  pub photo_type: PhotoType,
  pub file_count: u32,
  pub image_count: u32,
  pub bracketing: Option<BracketingInfo>,
  pub express: bool,
  pub subtotal_cents: u64,
  pub discount_cents: u64,
  pub total_price_cents: u64,
  pub coupon_code: Option<String>,
  pub contact_email: Option<String>,
  pub company_name: Option<String>,
  pub object_reference: Option<String>,
  pub special_requests: Option<String>,
  pub terms_accepted: bool,
  pub settlement_method: SettlementMethod,
  pub status: OrderStatus,
  pub payment_flow_status: PaymentFlowStatus,
  pub payment_status: PaymentStatus,
  pub created_at: DateTime<Utc>,
}

/// One selected extra, written in the same transaction as its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddOn {
  pub id: Uuid,
  pub order_id: Uuid,
  pub extra: Extra,
  pub name: String,
  pub unit_price_cents: u64,
}

/// An order together with its add-ons, as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
  pub order: Order,
  pub add_ons: Vec<OrderAddOn>,
}
