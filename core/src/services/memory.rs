// darkroom/src/services/memory.rs

//! In-process implementations of the service contracts.
//!
//! Used by the service when no database is configured, and by tests. Each one
//! can be told to fail so degraded submissions can be exercised.

use super::{
  BlobStore, CustomerProfile, DeliveryResult, Mailer, OrderStore, ProfileDirectory, ServicePrincipal, StaffNotifier,
  TemplateData,
};
use crate::error::StoreError;
use crate::models::{Order, OrderAddOn, OrderRecord, OrderStatus, PaymentStatus, UploadedAsset};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{event, Level};
use uuid::Uuid;

#[derive(Default)]
struct OrderTables {
  orders: HashMap<String, OrderRecord>,
  assets: Vec<UploadedAsset>,
}

/// Order store backed by a map keyed on order number.
#[derive(Default)]
pub struct MemoryOrderStore {
  tables: RwLock<OrderTables>,
  /// When set, only these owners have a complete profile.
  known_owners: Option<HashSet<Uuid>>,
  fail_writes: AtomicBool,
  collisions: AtomicUsize,
}

impl MemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rejects orders from owners outside `owners` with
  /// [`StoreError::IncompleteProfile`].
  pub fn with_known_owners(owners: impl IntoIterator<Item = Uuid>) -> Self {
    Self {
      known_owners: Some(owners.into_iter().collect()),
      ..Self::default()
    }
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// The next `count` order inserts fail as if the order number were taken.
  pub fn collide_next(&self, count: usize) {
    self.collisions.store(count, Ordering::SeqCst);
  }

  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }

  pub fn assets_for(&self, order_id: Uuid) -> Vec<UploadedAsset> {
    self
      .tables
      .read()
      .assets
      .iter()
      .filter(|a| a.order_id == order_id)
      .cloned()
      .collect()
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn create_order(&self, order: &Order, add_ons: &[OrderAddOn]) -> Result<(), StoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Backend(anyhow!("simulated order store outage")));
    }
    if let Some(known) = &self.known_owners {
      if !known.contains(&order.owner_id) {
        return Err(StoreError::IncompleteProfile(format!(
          "no customer profile for owner {}",
          order.owner_id
        )));
      }
    }

    let collided = self
      .collisions
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .is_ok();
    if collided {
      return Err(StoreError::Duplicate(order.order_number.clone()));
    }

    let mut tables = self.tables.write();
    if tables.orders.contains_key(&order.order_number) {
      return Err(StoreError::Duplicate(order.order_number.clone()));
    }
    tables.orders.insert(
      order.order_number.clone(),
      OrderRecord {
        order: order.clone(),
        add_ons: add_ons.to_vec(),
      },
    );
    event!(Level::DEBUG, order_number = %order.order_number, add_ons = add_ons.len(), "Order stored in memory.");
    Ok(())
  }

  async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>, StoreError> {
    Ok(self.tables.read().orders.get(order_number).cloned())
  }

  async fn record_asset(&self, asset: &UploadedAsset) -> Result<(), StoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Backend(anyhow!("simulated order store outage")));
    }
    self.tables.write().assets.push(asset.clone());
    Ok(())
  }

  async fn update_status(
    &self,
    order_number: &str,
    status: OrderStatus,
    payment_status: PaymentStatus,
  ) -> Result<bool, StoreError> {
    let mut tables = self.tables.write();
    match tables.orders.get_mut(order_number) {
      Some(record) => {
        record.order.status = status;
        record.order.payment_status = payment_status;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}

/// Blob store keeping bytes in a map keyed by path.
#[derive(Default)]
pub struct MemoryBlobStore {
  blobs: RwLock<HashMap<String, Vec<u8>>>,
  failing_paths: RwLock<Vec<String>>,
  fail_all: AtomicBool,
}

impl MemoryBlobStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_all(&self, fail: bool) {
    self.fail_all.store(fail, Ordering::SeqCst);
  }

  /// Fails every `put` whose path contains `fragment`.
  pub fn fail_paths_containing(&self, fragment: impl Into<String>) {
    self.failing_paths.write().push(fragment.into());
  }

  pub fn get(&self, path: &str) -> Option<Vec<u8>> {
    self.blobs.read().get(path).cloned()
  }

  pub fn paths(&self) -> Vec<String> {
    let mut paths: Vec<String> = self.blobs.read().keys().cloned().collect();
    paths.sort();
    paths
  }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
  async fn put(&self, bytes: Vec<u8>, path: &str) -> anyhow::Result<String> {
    let rejected = self.fail_all.load(Ordering::SeqCst)
      || self.failing_paths.read().iter().any(|fragment| path.contains(fragment.as_str()));
    if rejected {
      return Err(anyhow!("simulated blob storage failure for {path}"));
    }
    self.blobs.write().insert(path.to_string(), bytes);
    Ok(format!("memory://{path}"))
  }
}

/// A message captured by [`RecordingMailer`] or [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
  pub recipient: String,
  pub data: TemplateData,
  pub message_id: String,
}

/// Mailer that keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
  sent: RwLock<Vec<SentMessage>>,
  fail: AtomicBool,
}

impl RecordingMailer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail(&self, fail: bool) {
    self.fail.store(fail, Ordering::SeqCst);
  }

  pub fn sent(&self) -> Vec<SentMessage> {
    self.sent.read().clone()
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, to: &str, data: &TemplateData) -> anyhow::Result<DeliveryResult> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(anyhow!("simulated mail transport failure"));
    }
    let message_id = format!("mem_mail_{}", Uuid::new_v4());
    self.sent.write().push(SentMessage {
      recipient: to.to_string(),
      data: data.clone(),
      message_id: message_id.clone(),
    });
    Ok(DeliveryResult { message_id })
  }
}

/// Staff notifier that records notifications together with the principal used.
#[derive(Default)]
pub struct RecordingNotifier {
  sent: RwLock<Vec<SentMessage>>,
  fail: AtomicBool,
}

impl RecordingNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail(&self, fail: bool) {
    self.fail.store(fail, Ordering::SeqCst);
  }

  /// Recorded notifications. `recipient` holds the principal's name.
  pub fn sent(&self) -> Vec<SentMessage> {
    self.sent.read().clone()
  }
}

#[async_trait]
impl StaffNotifier for RecordingNotifier {
  async fn notify(&self, principal: &ServicePrincipal, data: &TemplateData) -> anyhow::Result<DeliveryResult> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(anyhow!("simulated staff notification failure"));
    }
    let message_id = format!("mem_staff_{}", Uuid::new_v4());
    self.sent.write().push(SentMessage {
      recipient: principal.name.clone(),
      data: data.clone(),
      message_id: message_id.clone(),
    });
    Ok(DeliveryResult { message_id })
  }
}

#[derive(Default)]
pub struct MemoryProfiles {
  profiles: RwLock<HashMap<Uuid, CustomerProfile>>,
  fail: AtomicBool,
}

impl MemoryProfiles {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, owner_id: Uuid, profile: CustomerProfile) {
    self.profiles.write().insert(owner_id, profile);
  }

  pub fn fail(&self, fail: bool) {
    self.fail.store(fail, Ordering::SeqCst);
  }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
  async fn lookup(&self, owner_id: Uuid) -> anyhow::Result<Option<CustomerProfile>> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(anyhow!("simulated profile directory failure"));
    }
    Ok(self.profiles.read().get(&owner_id).cloned())
  }
}
