// darkroom/examples/submit_order.rs

use darkroom::draft::DraftStore;
use darkroom::models::{AssetRef, Extra, PackageTier, PhotoType, SettlementMethod, StaticCatalog};
use darkroom::pricing::{format_cents, CouponPolicy};
use darkroom::services::memory::{MemoryBlobStore, MemoryOrderStore, MemoryProfiles, RecordingMailer, RecordingNotifier};
use darkroom::services::Caller;
use darkroom::submission::{Collaborators, SubmissionService, SubmissionSettings};
use darkroom::ConfirmationView;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Submit Order Example ---");

  // 1. Stage a few exposures on disk, as the upload widget would.
  let staging = std::env::temp_dir().join(format!("darkroom-example-{}", Uuid::new_v4()));
  tokio::fs::create_dir_all(&staging).await?;
  let mut files = Vec::new();
  for i in 0..6 {
    let name = format!("living_room_{i}.jpg");
    let path = staging.join(&name);
    tokio::fs::write(&path, vec![0u8; 1024]).await?;
    files.push(AssetRef::new(name, 1024, "image/jpeg", path));
  }

  // 2. Fill in the draft step by step.
  let catalog = Arc::new(StaticCatalog::standard());
  let mut draft = DraftStore::new(catalog.clone(), Some(CouponPolicy::default()));
  draft.set_photo_type(Some(PhotoType::Bracketed3));
  draft.advance()?;
  for file in files {
    draft.add_file(file);
  }
  draft.advance()?;
  draft.set_package(Some(PackageTier::Premium));
  draft.advance()?;
  draft.set_extra(Extra::Express, true);
  draft.advance()?;
  draft.set_contact_email("agent@example.com");
  draft.set_coupon_code(Some("darkroom10".to_string()));
  draft.set_terms_accepted(true);

  if let Some(price) = draft.draft().price() {
    info!(
      units = price.unit_count,
      total = %format_cents(price.total_cents),
      "Draft priced."
    );
  }

  // 3. Submit against in-memory collaborators.
  let collab = Collaborators {
    catalog,
    orders: Arc::new(MemoryOrderStore::new()),
    blobs: Arc::new(MemoryBlobStore::new()),
    mailer: Arc::new(RecordingMailer::new()),
    notifier: Arc::new(RecordingNotifier::new()),
    profiles: Arc::new(MemoryProfiles::new()),
  };
  let settings = SubmissionSettings::default();
  let calendar = settings.calendar;
  let service = SubmissionService::new(collab, settings)?;

  let receipt = service
    .submit(draft.draft(), SettlementMethod::Invoice, Caller::new(Uuid::new_v4()))
    .await?;
  draft.finish();

  let view = ConfirmationView::from_receipt(&receipt, &calendar);
  info!("Confirmation:\n{}", serde_json::to_string_pretty(&view)?);

  tokio::fs::remove_dir_all(&staging).await?;
  Ok(())
}
