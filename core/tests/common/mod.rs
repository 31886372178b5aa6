// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use darkroom::draft::DraftStore;
use darkroom::models::{AssetRef, Extra, PackageTier, PhotoType, StaticCatalog};
use darkroom::pricing::CouponPolicy;
use darkroom::services::memory::{MemoryBlobStore, MemoryOrderStore, MemoryProfiles, RecordingMailer, RecordingNotifier};
use darkroom::submission::{Collaborators, SubmissionService, SubmissionSettings};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

// --- Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Assets ---

/// Writes a small file into `dir` and returns a reference to it.
pub fn staged_file(dir: &Path, name: &str) -> AssetRef {
  let path = dir.join(name);
  let bytes = format!("raw bytes of {name}").into_bytes();
  std::fs::write(&path, &bytes).expect("write staged file");
  AssetRef::new(name, bytes.len() as u64, "image/jpeg", path)
}

/// A reference to a file that does not exist, so reading it fails.
pub fn missing_file(dir: &Path, name: &str) -> AssetRef {
  AssetRef::new(name, 1024, "image/jpeg", dir.join("never-written").join(name))
}

pub fn unstaged_files(count: usize) -> Vec<AssetRef> {
  (0..count)
    .map(|i| AssetRef::new(format!("IMG_{i:04}.jpg"), 2048, "image/jpeg", format!("/nonexistent/IMG_{i:04}.jpg")))
    .collect()
}

// --- Drafts ---

pub fn new_store() -> DraftStore {
  DraftStore::new(Arc::new(StaticCatalog::standard()), Some(CouponPolicy::default()))
}

/// A draft that passes every submission guard, with `file_count` staged files.
pub fn ready_store(dir: &Path, photo_type: PhotoType, file_count: usize) -> DraftStore {
  let mut store = new_store();
  store.set_photo_type(Some(photo_type));
  for i in 0..file_count {
    store.add_file(staged_file(dir, &format!("IMG_{i:04}.jpg")));
  }
  store.set_package(Some(PackageTier::Basic));
  store.set_contact_email("client@example.com");
  store.set_terms_accepted(true);
  store
}

pub fn ready_store_with_extras(dir: &Path, extras: &[Extra]) -> DraftStore {
  let mut store = ready_store(dir, PhotoType::Camera, 2);
  for extra in extras {
    store.set_extra(*extra, true);
  }
  if extras.contains(&Extra::Watermark) {
    store.set_watermark_asset(Some(staged_file(dir, "logo.png")));
  }
  store
}

// --- Submission fixture ---

pub struct Fixture {
  pub orders: Arc<MemoryOrderStore>,
  pub blobs: Arc<MemoryBlobStore>,
  pub mailer: Arc<RecordingMailer>,
  pub notifier: Arc<RecordingNotifier>,
  pub profiles: Arc<MemoryProfiles>,
  pub service: SubmissionService,
  pub dir: TempDir,
}

impl Fixture {
  pub fn new() -> Self {
    Self::with_parts(StaticCatalog::standard(), MemoryOrderStore::new())
  }

  pub fn with_parts(catalog: StaticCatalog, orders: MemoryOrderStore) -> Self {
    let orders = Arc::new(orders);
    let blobs = Arc::new(MemoryBlobStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let profiles = Arc::new(MemoryProfiles::new());
    let collab = Collaborators {
      catalog: Arc::new(catalog),
      orders: orders.clone(),
      blobs: blobs.clone(),
      mailer: mailer.clone(),
      notifier: notifier.clone(),
      profiles: profiles.clone(),
    };
    let service = SubmissionService::new(collab, SubmissionSettings::default()).expect("pipeline builds");
    Self {
      orders,
      blobs,
      mailer,
      notifier,
      profiles,
      service,
      dir: tempfile::tempdir().expect("temp dir"),
    }
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }
}
