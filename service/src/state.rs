// darkroom_service/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::services::{FsBlobStore, LoggingMailer, LoggingStaffNotifier};
use darkroom::models::{Catalog, StaticCatalog};
use darkroom::pricing::CouponPolicy;
use darkroom::schedule::BusinessCalendar;
use darkroom::services::{OrderStore, ProfileDirectory, ServicePrincipal};
use darkroom::{Collaborators, SubmissionService, SubmissionSettings};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<dyn Catalog>,
  pub orders: Arc<dyn OrderStore>,
  pub submission: Arc<SubmissionService>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Wires the submission pipeline around the given stores. Blobs go to the
  /// filesystem and mail is logged.
  pub fn build(
    config: Arc<AppConfig>,
    orders: Arc<dyn OrderStore>,
    profiles: Arc<dyn ProfileDirectory>,
  ) -> Result<Self> {
    let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::standard());
    let settings = SubmissionSettings {
      coupon: config.coupon()?,
      calendar: config.calendar()?,
      staff_address: config.staff_notify_address.clone(),
      principal: ServicePrincipal::new(config.service_principal.clone()),
    };
    let collaborators = Collaborators {
      catalog: catalog.clone(),
      orders: orders.clone(),
      blobs: Arc::new(FsBlobStore::new(config.blob_root.clone())),
      mailer: Arc::new(LoggingMailer::new(config.mail_sender.clone())),
      notifier: Arc::new(LoggingStaffNotifier),
      profiles,
    };
    let submission = SubmissionService::new(collaborators, settings)
      .map_err(|e| AppError::Internal(format!("Failed to build submission pipeline: {}", e)))?;
    info!("Submission pipeline registered.");

    Ok(Self {
      catalog,
      orders,
      submission: Arc::new(submission),
      config,
    })
  }

  pub fn calendar(&self) -> BusinessCalendar {
    self.submission.settings().calendar
  }

  pub fn coupon(&self) -> Option<CouponPolicy> {
    self.submission.settings().coupon.clone()
  }
}
