// darkroom/src/submission/mod.rs

//! Turns a finished draft into a durable order.
//!
//! Everything up to and including the order insert is required: a failure there
//! means no order exists. Uploading assets, emailing the customer and notifying
//! staff happen afterwards, each on its own. Their failures are logged with the
//! order id and number and reported on the [`SubmissionReceipt`], never as an
//! error.

pub mod context;
pub mod steps;

pub use context::SubmissionCtxData;

use crate::draft::OrderDraft;
use crate::error::{PipelineError, SubmissionError};
use crate::models::{Catalog, Order, OrderAddOn, SettlementMethod, UploadedAsset};
use crate::pipeline::{ContextData, Pipeline, StepKind};
use crate::pricing::CouponPolicy;
use crate::schedule::BusinessCalendar;
use crate::services::{BlobStore, Caller, Mailer, OrderStore, ProfileDirectory, ServicePrincipal, StaffNotifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A best-effort channel that runs after the order is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideChannel {
  AssetUpload,
  ConfirmationEmail,
  StaffNotification,
}

impl SideChannel {
  pub fn for_step(step_name: &str) -> Option<Self> {
    match step_name {
      steps::UPLOAD_ASSETS => Some(SideChannel::AssetUpload),
      steps::SEND_CONFIRMATION => Some(SideChannel::ConfirmationEmail),
      steps::NOTIFY_STAFF => Some(SideChannel::StaffNotification),
      _ => None,
    }
  }

  /// Staff-side failures stay internal.
  pub fn is_customer_visible(self) -> bool {
    !matches!(self, SideChannel::StaffNotification)
  }
}

impl fmt::Display for SideChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      SideChannel::AssetUpload => "asset upload",
      SideChannel::ConfirmationEmail => "confirmation email",
      SideChannel::StaffNotification => "staff notification",
    };
    f.write_str(name)
  }
}

/// Non-blocking conditions the customer should be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionWarning {
  MissingContactEmail,
}

/// Shared handles to everything a submission talks to.
#[derive(Clone)]
pub struct Collaborators {
  pub catalog: Arc<dyn Catalog>,
  pub orders: Arc<dyn OrderStore>,
  pub blobs: Arc<dyn BlobStore>,
  pub mailer: Arc<dyn Mailer>,
  pub notifier: Arc<dyn StaffNotifier>,
  pub profiles: Arc<dyn ProfileDirectory>,
}

#[derive(Debug, Clone)]
pub struct SubmissionSettings {
  pub coupon: Option<CouponPolicy>,
  pub calendar: BusinessCalendar,
  pub staff_address: String,
  pub principal: ServicePrincipal,
}

impl Default for SubmissionSettings {
  fn default() -> Self {
    Self {
      coupon: Some(CouponPolicy::default()),
      calendar: BusinessCalendar::default(),
      staff_address: "orders@darkroom.local".to_string(),
      principal: ServicePrincipal::new("darkroom-intake"),
    }
  }
}

/// What a successful submission hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
  pub order: Order,
  pub add_ons: Vec<OrderAddOn>,
  pub uploaded_assets: Vec<UploadedAsset>,
  pub warnings: Vec<SubmissionWarning>,
  pub degraded_channels: Vec<SideChannel>,
  pub eta: DateTime<Utc>,
  /// Delivery ids, for tracing a message back to the order.
  pub confirmation_message_id: Option<String>,
  pub staff_message_id: Option<String>,
}

impl SubmissionReceipt {
  pub fn is_degraded(&self) -> bool {
    !self.degraded_channels.is_empty()
  }

  /// Secondary notices shown next to the confirmation.
  pub fn customer_notices(&self) -> Vec<String> {
    let mut notices: Vec<String> = self
      .warnings
      .iter()
      .map(|warning| match warning {
        SubmissionWarning::MissingContactEmail => {
          "No contact email was provided, so no confirmation email was sent.".to_string()
        }
      })
      .collect();
    for channel in self.degraded_channels.iter().filter(|c| c.is_customer_visible()) {
      notices.push(match channel {
        SideChannel::AssetUpload => {
          "Your order was received, but some files could not be stored. Our team will contact you.".to_string()
        }
        SideChannel::ConfirmationEmail => {
          "Your order was received, but the confirmation email could not be sent.".to_string()
        }
        SideChannel::StaffNotification => continue,
      });
    }
    notices
  }
}

pub struct SubmissionService {
  pipeline: Pipeline<SubmissionCtxData, SubmissionError>,
  settings: Arc<SubmissionSettings>,
}

impl SubmissionService {
  pub fn new(collab: Collaborators, settings: SubmissionSettings) -> Result<Self, PipelineError> {
    let settings = Arc::new(settings);
    let mut pipeline = Pipeline::new(&[
      (steps::VALIDATE_DRAFT, StepKind::Required),
      (steps::RESOLVE_PACKAGE, StepKind::Required),
      (steps::PRICE_ORDER, StepKind::Required),
      (steps::ASSIGN_ORDER_NUMBER, StepKind::Required),
      (steps::PERSIST_ORDER, StepKind::Required),
      (steps::UPLOAD_ASSETS, StepKind::BestEffort),
      (steps::SEND_CONFIRMATION, StepKind::BestEffort),
      (steps::NOTIFY_STAFF, StepKind::BestEffort),
    ])?;

    pipeline.on(steps::VALIDATE_DRAFT, steps::validate_draft)?;
    {
      let collab = collab.clone();
      pipeline.on(steps::RESOLVE_PACKAGE, move |ctx| steps::resolve_package(ctx, collab.clone()))?;
    }
    {
      let (collab, settings) = (collab.clone(), settings.clone());
      pipeline.on(steps::PRICE_ORDER, move |ctx| {
        steps::price_order(ctx, collab.clone(), settings.clone())
      })?;
    }
    {
      let settings = settings.clone();
      pipeline.on(steps::ASSIGN_ORDER_NUMBER, move |ctx| {
        steps::assign_order_number(ctx, settings.clone())
      })?;
    }
    {
      let collab = collab.clone();
      pipeline.on(steps::PERSIST_ORDER, move |ctx| steps::persist_order(ctx, collab.clone()))?;
    }
    {
      let collab = collab.clone();
      pipeline.on(steps::UPLOAD_ASSETS, move |ctx| steps::upload_assets(ctx, collab.clone()))?;
    }
    {
      let collab = collab.clone();
      pipeline.on(steps::SEND_CONFIRMATION, move |ctx| {
        steps::send_confirmation(ctx, collab.clone())
      })?;
    }
    {
      let settings = settings.clone();
      pipeline.on(steps::NOTIFY_STAFF, move |ctx| {
        steps::notify_staff(ctx, collab.clone(), settings.clone())
      })?;
    }

    Ok(Self { pipeline, settings })
  }

  pub fn settings(&self) -> &SubmissionSettings {
    &self.settings
  }

  /// Submits `draft` on behalf of `caller`.
  ///
  /// Returns an error only when no order was created. Two calls with identical
  /// drafts create two orders.
  #[instrument(
    name = "SubmissionService::submit",
    skip_all,
    fields(owner_id = %caller.user_id, settlement = ?settlement)
  )]
  pub async fn submit(
    &self,
    draft: &OrderDraft,
    settlement: SettlementMethod,
    caller: Caller,
  ) -> Result<SubmissionReceipt, SubmissionError> {
    self.submit_at(draft, settlement, caller, Utc::now()).await
  }

  /// Like [`SubmissionService::submit`] with an explicit creation instant.
  pub async fn submit_at(
    &self,
    draft: &OrderDraft,
    settlement: SettlementMethod,
    caller: Caller,
    created_at: DateTime<Utc>,
  ) -> Result<SubmissionReceipt, SubmissionError> {
    let ctx = ContextData::new(SubmissionCtxData::new(
      draft.inputs().clone(),
      settlement,
      caller,
      created_at,
    ));
    let outcome = self.pipeline.run(ctx.clone()).await?;

    let degraded_channels: Vec<SideChannel> = outcome
      .failures
      .iter()
      .filter_map(|failure| SideChannel::for_step(&failure.step_name))
      .collect();

    let mut data = ctx.write();
    let order = data
      .order
      .take()
      .filter(|_| data.persisted)
      .ok_or_else(|| PipelineError::Internal("pipeline finished without persisting the order".to_string()))?;
    let eta = data.eta.unwrap_or_else(|| self.settings.calendar.calculate_eta(order.created_at, order.express));

    if degraded_channels.is_empty() {
      info!(order_number = %order.order_number, "Submission completed.");
    } else {
      warn!(
        order_id = %order.id,
        order_number = %order.order_number,
        degraded = ?degraded_channels,
        "Submission completed with degraded side channels."
      );
    }

    Ok(SubmissionReceipt {
      order,
      add_ons: std::mem::take(&mut data.add_ons),
      uploaded_assets: std::mem::take(&mut data.uploaded_assets),
      warnings: std::mem::take(&mut data.warnings),
      degraded_channels,
      eta,
      confirmation_message_id: data.confirmation_message_id.take(),
      staff_message_id: data.staff_message_id.take(),
    })
  }
}
