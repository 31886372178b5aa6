// darkroom/src/services/mod.rs

//! Contracts for everything the submission pipeline talks to.
//!
//! The order store is the only authoritative dependency. The rest are side
//! channels whose failures are tolerated.

pub mod memory;

use crate::error::StoreError;
use crate::models::{Order, OrderAddOn, OrderRecord, OrderStatus, PaymentStatus, UploadedAsset};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The identity a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id: Uuid,
}

impl Caller {
  pub fn new(user_id: Uuid) -> Self {
    Self { user_id }
  }
}

/// The privileged identity staff notifications are sent under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipal {
  pub name: String,
}

impl ServicePrincipal {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
  pub display_name: String,
  pub company: Option<String>,
}

/// Named template plus the values it is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateData {
  pub template: String,
  pub subject: String,
  pub fields: BTreeMap<String, String>,
}

impl TemplateData {
  pub fn new(template: impl Into<String>, subject: impl Into<String>) -> Self {
    Self {
      template: template.into(),
      subject: subject.into(),
      fields: BTreeMap::new(),
    }
  }

  pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.fields.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.fields.get(key).map(String::as_str)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
  pub message_id: String,
}

/// Transactional row store for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Inserts the order and all of its add-ons atomically. Either every row is
  /// written or none is.
  async fn create_order(&self, order: &Order, add_ons: &[OrderAddOn]) -> Result<(), StoreError>;

  async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>, StoreError>;

  async fn record_asset(&self, asset: &UploadedAsset) -> Result<(), StoreError>;

  /// Moves an existing order's fulfilment or payment status. Returns `false`
  /// when no order has that number.
  async fn update_status(
    &self,
    order_number: &str,
    status: OrderStatus,
    payment_status: PaymentStatus,
  ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Stores `bytes` under `path` and returns the storage key.
  async fn put(&self, bytes: Vec<u8>, path: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, to: &str, data: &TemplateData) -> anyhow::Result<DeliveryResult>;
}

#[async_trait]
pub trait StaffNotifier: Send + Sync {
  async fn notify(&self, principal: &ServicePrincipal, data: &TemplateData) -> anyhow::Result<DeliveryResult>;
}

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
  /// `Ok(None)` when the customer never filled in a profile.
  async fn lookup(&self, owner_id: Uuid) -> anyhow::Result<Option<CustomerProfile>>;
}
