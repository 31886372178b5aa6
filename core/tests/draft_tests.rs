// tests/draft_tests.rs
mod common;
use common::*;
use darkroom::draft::{AbandonmentSignal, DraftSnapshot, DraftStore, FunnelObserver, WizardStep};
use darkroom::models::{AssetRef, Extra, PackageTier, PhotoType, StaticCatalog};
use darkroom::pricing::CouponPolicy;
use darkroom::{DraftError, ValidationError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct CapturingObserver {
  signals: Mutex<Vec<AbandonmentSignal>>,
}

impl FunnelObserver for CapturingObserver {
  fn draft_abandoned(&self, signal: &AbandonmentSignal) {
    self.signals.lock().push(signal.clone());
  }
}

fn file(name: &str) -> AssetRef {
  AssetRef::new(name, 4096, "image/jpeg", format!("/staging/{name}"))
}

fn expect_validation(result: Result<WizardStep, DraftError>, expected: ValidationError) {
  match result {
    Err(DraftError::Validation(actual)) => assert_eq!(actual, expected),
    other => panic!("Expected validation error {expected:?}, got {other:?}"),
  }
}

#[test]
fn test_new_draft_is_empty_and_invalid() {
  let store = new_store();
  assert_eq!(store.current_step(), WizardStep::PhotoType);
  assert!(!store.draft().is_valid());
  assert_eq!(store.draft().effective_unit_count(), 0);
  assert!(store.draft().price().is_none());
}

#[test]
fn test_walk_through_every_step() {
  setup_tracing();
  let mut store = new_store();

  expect_validation(store.advance(), ValidationError::PhotoTypeMissing);
  store.set_photo_type(Some(PhotoType::Camera));
  assert_eq!(store.advance().unwrap(), WizardStep::Upload);

  expect_validation(store.advance(), ValidationError::NoFiles);
  store.add_file(file("a.jpg"));
  assert_eq!(store.advance().unwrap(), WizardStep::Package);

  expect_validation(store.advance(), ValidationError::PackageMissing);
  store.set_package(Some(PackageTier::Premium));
  assert_eq!(store.advance().unwrap(), WizardStep::Extras);

  store.set_extra(Extra::Watermark, true);
  expect_validation(store.advance(), ValidationError::WatermarkMissing);
  store.set_watermark_asset(Some(file("logo.png")));
  assert_eq!(store.advance().unwrap(), WizardStep::Summary);

  expect_validation(store.advance(), ValidationError::TermsNotAccepted);
  store.set_terms_accepted(true);
  expect_validation(store.advance(), ValidationError::ContactEmailMissing);
  store.set_contact_email("someone@example.com");
  assert_eq!(store.advance().unwrap(), WizardStep::Confirmation);
  assert_eq!(store.furthest_step(), WizardStep::Confirmation);

  expect_validation(store.advance(), ValidationError::FinalStep);

  assert_eq!(store.back(), WizardStep::Summary);
  assert_eq!(store.current_step(), WizardStep::Summary);
  assert_eq!(store.furthest_step(), WizardStep::Confirmation);
}

#[test]
fn test_back_navigation() {
  let mut store = new_store();
  assert_eq!(store.back(), WizardStep::PhotoType);

  store.set_photo_type(Some(PhotoType::Handheld));
  store.advance().unwrap();
  assert_eq!(store.back(), WizardStep::PhotoType);
  assert_eq!(store.furthest_step(), WizardStep::Upload);
}

#[test]
fn test_derived_fields_follow_every_mutation() {
  let mut store = new_store();
  store.set_photo_type(Some(PhotoType::Bracketed3));
  for i in 0..7 {
    store.add_file(file(&format!("exp_{i}.jpg")));
  }
  assert_eq!(store.draft().effective_unit_count(), 3);
  assert!(store.draft().price().is_none());

  store.set_package(Some(PackageTier::Basic));
  assert_eq!(store.draft().price().unwrap().total_cents, 4500);

  store.remove_file(6).unwrap();
  assert_eq!(store.draft().effective_unit_count(), 2);
  assert_eq!(store.draft().price().unwrap().total_cents, 3000);

  store.set_photo_type(Some(PhotoType::Handheld));
  assert_eq!(store.draft().effective_unit_count(), 6);

  assert!(store.toggle_extra(Extra::Express));
  assert_eq!(store.draft().price().unwrap().unit_price_cents, 2400);
  assert!(!store.toggle_extra(Extra::Express));
  assert_eq!(store.draft().price().unwrap().unit_price_cents, 1500);

  store.set_coupon_code(Some("darkroom10".to_string()));
  let price = store.draft().price().unwrap();
  assert!(price.coupon_applied);
  assert_eq!(price.total_cents, 9000 - 900);

  store.clear_files();
  assert_eq!(store.draft().effective_unit_count(), 0);
  assert!(!store.draft().is_valid());
}

#[test]
fn test_reordering_files_changes_grouping_not_count() {
  let mut store = new_store();
  store.set_photo_type(Some(PhotoType::Bracketed3));
  for name in ["a.jpg", "b.jpg", "c.jpg", "d.jpg"] {
    store.add_file(file(name));
  }
  store.move_file(3, 0).unwrap();
  let names: Vec<&str> = store.draft().files().iter().map(|f| f.name.as_str()).collect();
  assert_eq!(names, ["d.jpg", "a.jpg", "b.jpg", "c.jpg"]);
  assert_eq!(store.draft().effective_unit_count(), 2);

  match store.move_file(0, 9) {
    Err(DraftError::FileIndexOutOfRange { index: 9, len: 4 }) => {}
    other => panic!("Expected out-of-range error, got {other:?}"),
  }
  assert!(matches!(
    store.remove_file(4),
    Err(DraftError::FileIndexOutOfRange { index: 4, len: 4 })
  ));
}

#[test]
fn test_is_valid_requires_package_and_files() {
  let mut store = new_store();
  store.set_package(Some(PackageTier::Basic));
  assert!(!store.draft().is_valid());
  store.add_file(file("a.jpg"));
  assert!(store.draft().is_valid());
  store.set_package(None);
  assert!(!store.draft().is_valid());
}

#[test]
fn test_is_valid_on_summary_also_needs_terms_and_email() {
  let dir = tempfile::tempdir().unwrap();
  let mut store = ready_store(dir.path(), PhotoType::Camera, 1);
  store.set_terms_accepted(false);
  for _ in 0..4 {
    store.advance().unwrap();
  }
  assert_eq!(store.current_step(), WizardStep::Summary);
  assert!(!store.draft().is_valid());

  store.set_terms_accepted(true);
  assert!(store.draft().is_valid());
  store.set_contact_email("   ");
  assert!(!store.draft().is_valid());
}

#[test]
fn test_snapshot_round_trip_resumes_at_first_unmet_step() {
  let mut store = new_store();
  store.set_photo_type(Some(PhotoType::Bracketed5));
  store.add_file(file("one.jpg"));
  store.add_file(file("two.jpg"));
  let json = store.serialize().unwrap();
  assert!(!json.contains("is_valid"));
  assert!(!json.contains("effective_unit_count"));

  let restored = DraftStore::restore(&json, Arc::new(StaticCatalog::standard()), None).unwrap();
  assert_eq!(restored.current_step(), WizardStep::Package);
  assert_eq!(restored.draft().inputs(), store.draft().inputs());
  assert_eq!(restored.draft().effective_unit_count(), 1);
}

#[test]
fn test_complete_snapshot_resumes_at_summary() {
  let dir = tempfile::tempdir().unwrap();
  let store = ready_store(dir.path(), PhotoType::Camera, 3);
  let restored = DraftStore::from_snapshot(
    store.snapshot(),
    Arc::new(StaticCatalog::standard()),
    Some(CouponPolicy::default()),
  )
  .unwrap();
  assert_eq!(restored.current_step(), WizardStep::Summary);
  assert!(restored.draft().is_valid());
  assert_eq!(restored.draft().price().unwrap().total_cents, 4500);
}

#[test]
fn test_restore_rejects_bad_snapshots() {
  let catalog = Arc::new(StaticCatalog::standard());
  let future = DraftSnapshot {
    version: DraftSnapshot::CURRENT_VERSION + 1,
    inputs: Default::default(),
  };
  assert!(matches!(
    DraftStore::from_snapshot(future, catalog.clone(), None),
    Err(DraftError::UnsupportedSnapshotVersion { .. })
  ));
  assert!(matches!(
    DraftStore::restore("{not json", catalog, None),
    Err(DraftError::Snapshot(_))
  ));
}

#[test]
fn test_reset_emits_one_abandonment_signal() {
  setup_tracing();
  let observer = Arc::new(CapturingObserver::default());
  let mut store = new_store().with_observer(observer.clone());
  store.set_photo_type(Some(PhotoType::Camera));
  store.advance().unwrap();
  store.add_file(file("a.jpg"));

  let signal = store.reset();
  assert_eq!(signal.furthest_step, WizardStep::Upload);
  assert_eq!(signal.abandoned_at, WizardStep::Upload);
  assert_eq!(signal.file_count, 1);
  assert_eq!(observer.signals.lock().as_slice(), &[signal]);

  assert_eq!(store.current_step(), WizardStep::PhotoType);
  assert!(store.draft().files().is_empty());
}

#[test]
fn test_finish_clears_without_signal() {
  let observer = Arc::new(CapturingObserver::default());
  let mut store = new_store().with_observer(observer.clone());
  store.add_file(file("a.jpg"));
  store.finish();
  assert!(store.draft().files().is_empty());
  assert!(observer.signals.lock().is_empty());
}
