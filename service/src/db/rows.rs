// darkroom_service/src/db/rows.rs

//! Row shapes for the Postgres tables and their conversions to core types.
//!
//! Enums are stored as their serde names (`"bracketed-3"`, `"awaiting_gateway"`)
//! so the database and the JSON API agree on spelling.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use darkroom::models::{BracketingInfo, Order, OrderAddOn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub fn enum_to_db<T: Serialize>(value: &T) -> anyhow::Result<String> {
  match serde_json::to_value(value)? {
    serde_json::Value::String(s) => Ok(s),
    other => Err(anyhow!("expected a string-like enum, got {other}")),
  }
}

pub fn enum_from_db<T: DeserializeOwned>(column: &str, value: &str) -> anyhow::Result<T> {
  serde_json::from_value(serde_json::Value::String(value.to_string()))
    .with_context(|| format!("unknown value '{value}' in column {column}"))
}

pub fn cents_to_db(cents: u64) -> anyhow::Result<i64> {
  i64::try_from(cents).context("amount does not fit in BIGINT")
}

pub fn count_to_db(count: u32) -> anyhow::Result<i32> {
  i32::try_from(count).context("count does not fit in INTEGER")
}

fn cents_from_db(column: &str, value: i64) -> anyhow::Result<u64> {
  u64::try_from(value).with_context(|| format!("negative amount in column {column}"))
}

fn count_from_db(column: &str, value: i32) -> anyhow::Result<u32> {
  u32::try_from(value).with_context(|| format!("negative count in column {column}"))
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: Uuid,
  pub order_number: String,
  pub owner_id: Uuid,
  pub package: String,
  pub package_name: String,
  pub package_unit_price_cents: i64,
  pub photo_type: String,
  pub file_count: i32,
  pub image_count: i32,
  pub bracketing: Option<Json<BracketingInfo>>,
  pub express: bool,
  pub subtotal_cents: i64,
  pub discount_cents: i64,
  pub total_price_cents: i64,
  pub coupon_code: Option<String>,
  pub contact_email: Option<String>,
  pub company_name: Option<String>,
  pub object_reference: Option<String>,
  pub special_requests: Option<String>,
  pub terms_accepted: bool,
  pub settlement_method: String,
  pub status: String,
  pub payment_flow_status: String,
  pub payment_status: String,
  pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = anyhow::Error;

  fn try_from(row: OrderRow) -> anyhow::Result<Self> {
    Ok(Order {
      id: row.id,
      order_number: row.order_number,
      owner_id: row.owner_id,
      package: enum_from_db("package", &row.package)?,
      package_name: row.package_name,
      package_unit_price_cents: cents_from_db("package_unit_price_cents", row.package_unit_price_cents)?,
      photo_type: enum_from_db("photo_type", &row.photo_type)?,
      file_count: count_from_db("file_count", row.file_count)?,
      image_count: count_from_db("image_count", row.image_count)?,
      bracketing: row.bracketing.map(|json| json.0),
      express: row.express,
      subtotal_cents: cents_from_db("subtotal_cents", row.subtotal_cents)?,
      discount_cents: cents_from_db("discount_cents", row.discount_cents)?,
      total_price_cents: cents_from_db("total_price_cents", row.total_price_cents)?,
      coupon_code: row.coupon_code,
      contact_email: row.contact_email,
      company_name: row.company_name,
      object_reference: row.object_reference,
      special_requests: row.special_requests,
      terms_accepted: row.terms_accepted,
      settlement_method: enum_from_db("settlement_method", &row.settlement_method)?,
      status: enum_from_db("status", &row.status)?,
      payment_flow_status: enum_from_db("payment_flow_status", &row.payment_flow_status)?,
      payment_status: enum_from_db("payment_status", &row.payment_status)?,
      created_at: row.created_at,
    })
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderAddOnRow {
  pub id: Uuid,
  pub order_id: Uuid,
  pub extra: String,
  pub name: String,
  pub unit_price_cents: i64,
}

impl TryFrom<OrderAddOnRow> for OrderAddOn {
  type Error = anyhow::Error;

  fn try_from(row: OrderAddOnRow) -> anyhow::Result<Self> {
    Ok(OrderAddOn {
      id: row.id,
      order_id: row.order_id,
      extra: enum_from_db("extra", &row.extra)?,
      name: row.name,
      unit_price_cents: cents_from_db("unit_price_cents", row.unit_price_cents)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use darkroom::models::{Extra, PaymentFlowStatus, PhotoType};

  #[test]
  fn enums_use_their_serde_names() {
    assert_eq!(enum_to_db(&PhotoType::Bracketed3).unwrap(), "bracketed-3");
    assert_eq!(enum_to_db(&Extra::SoftRetouch).unwrap(), "soft-retouch");
    assert_eq!(enum_to_db(&PaymentFlowStatus::AwaitingGateway).unwrap(), "awaiting_gateway");
    let parsed: PhotoType = enum_from_db("photo_type", "bracketed-5").unwrap();
    assert_eq!(parsed, PhotoType::Bracketed5);
    assert!(enum_from_db::<PhotoType>("photo_type", "panorama").is_err());
  }

  #[test]
  fn amounts_reject_out_of_range_values() {
    assert_eq!(cents_to_db(1_500).unwrap(), 1_500);
    assert!(cents_to_db(u64::MAX).is_err());
    assert!(cents_from_db("total_price_cents", -1).is_err());
  }
}
