use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use darkroom::draft::{DraftInputs, DraftStore};
use darkroom::models::{AssetRef, Extra, PackageTier, PhotoType, SettlementMethod, StaticCatalog};
use darkroom::pricing::{compute_total_price, effective_unit_count, CouponPolicy};
use darkroom::schedule::BusinessCalendar;
use darkroom::services::memory::{MemoryBlobStore, MemoryOrderStore, MemoryProfiles, RecordingMailer, RecordingNotifier};
use darkroom::services::Caller;
use darkroom::submission::{Collaborators, SubmissionService, SubmissionSettings};
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

fn files(count: usize) -> Vec<AssetRef> {
  (0..count)
    .map(|i| AssetRef::new(format!("IMG_{i:05}.jpg"), 4096, "image/jpeg", format!("/staging/IMG_{i:05}.jpg")))
    .collect()
}

// --- Resolver ---
fn bench_resolver(c: &mut Criterion) {
  let mut group = c.benchmark_group("Resolver");
  let catalog = StaticCatalog::standard();
  let coupon = CouponPolicy::default();

  for count in [10usize, 300, 3_000].iter() {
    let draft = DraftInputs {
      photo_type: Some(PhotoType::Bracketed5),
      files: files(*count),
      package: Some(PackageTier::Premium),
      extras: Extra::ALL.into_iter().collect(),
      coupon_code: Some("darkroom10".to_string()),
      ..DraftInputs::default()
    };
    group.throughput(Throughput::Elements(*count as u64));
    group.bench_with_input(BenchmarkId::new("effective_unit_count", count), count, |b, _| {
      b.iter(|| effective_unit_count(&draft.files, draft.photo_type))
    });
    group.bench_with_input(BenchmarkId::new("compute_total_price", count), count, |b, _| {
      b.iter(|| compute_total_price(&draft, &catalog, Some(&coupon)))
    });
  }
  group.finish();
}

// --- Draft recomputation on mutation ---
fn bench_draft_mutation(c: &mut Criterion) {
  let mut group = c.benchmark_group("DraftMutation");
  group.bench_function("toggle_extra_with_300_files", |b| {
    let mut store = DraftStore::new(Arc::new(StaticCatalog::standard()), Some(CouponPolicy::default()));
    store.set_photo_type(Some(PhotoType::Bracketed3));
    store.set_package(Some(PackageTier::Basic));
    for file in files(300) {
      store.add_file(file);
    }
    b.iter(|| store.toggle_extra(Extra::Express))
  });
  group.finish();
}

// --- Scheduler ---
fn bench_scheduler(c: &mut Criterion) {
  let mut group = c.benchmark_group("Scheduler");
  let calendar = BusinessCalendar::default();
  let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  let instants: Vec<_> = (0..168).map(|h| base + Duration::hours(h)).collect();

  group.throughput(Throughput::Elements(instants.len() as u64));
  group.bench_function("calculate_eta_one_week_hourly", |b| {
    b.iter(|| {
      instants
        .iter()
        .map(|created| calendar.calculate_eta(*created, created.timestamp() % 2 == 0))
        .max()
    })
  });
  group.finish();
}

// --- Full submission against in-memory collaborators ---
fn bench_submission(c: &mut Criterion) {
  let mut group = c.benchmark_group("Submission");
  let rt = Runtime::new().unwrap();
  let dir = tempfile::tempdir().unwrap();

  let collab = Collaborators {
    catalog: Arc::new(StaticCatalog::standard()),
    orders: Arc::new(MemoryOrderStore::new()),
    blobs: Arc::new(MemoryBlobStore::new()),
    mailer: Arc::new(RecordingMailer::new()),
    notifier: Arc::new(RecordingNotifier::new()),
    profiles: Arc::new(MemoryProfiles::new()),
  };
  let service = SubmissionService::new(collab, SubmissionSettings::default()).unwrap();

  for count in [1usize, 10].iter() {
    let mut store = DraftStore::new(Arc::new(StaticCatalog::standard()), None);
    store.set_photo_type(Some(PhotoType::Camera));
    store.set_package(Some(PackageTier::Basic));
    store.set_contact_email("bench@example.com");
    store.set_terms_accepted(true);
    for i in 0..*count {
      let path = dir.path().join(format!("bench_{i}.jpg"));
      std::fs::write(&path, vec![0u8; 16 * 1024]).unwrap();
      store.add_file(AssetRef::new(format!("bench_{i}.jpg"), 16 * 1024, "image/jpeg", path));
    }

    group.throughput(Throughput::Elements(1));
    group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
      b.to_async(&rt)
        .iter(|| service.submit(store.draft(), SettlementMethod::Card, Caller::new(Uuid::new_v4())))
    });
  }
  group.finish();
}

criterion_group!(
  benches,
  bench_resolver,
  bench_draft_mutation,
  bench_scheduler,
  bench_submission
);
criterion_main!(benches);
