// darkroom/src/submission/steps.rs

//! Step handlers of the submission pipeline, in execution order.
//!
//! Handlers copy what they need out of the context before awaiting anything and
//! write results back afterwards; no lock guard lives across an `.await`.

use super::context::SubmissionCtxData;
use super::{Collaborators, SideChannel, SubmissionSettings, SubmissionWarning};
use crate::error::{PipelineError, PricingError, SideEffectError, StoreError, SubmissionError};
use crate::models::{AssetKind, AssetRef, BracketingInfo, Order, OrderAddOn, OrderStatus, PaymentStatus, UploadedAsset};
use crate::pipeline::{ContextData, PipelineControl};
use crate::pricing::{self, format_cents};
use crate::services::TemplateData;
use anyhow::{anyhow, Context as _};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const VALIDATE_DRAFT: &str = "validate_draft";
pub const RESOLVE_PACKAGE: &str = "resolve_package";
pub const PRICE_ORDER: &str = "price_order";
pub const ASSIGN_ORDER_NUMBER: &str = "assign_order_number";
pub const PERSIST_ORDER: &str = "persist_order";
pub const UPLOAD_ASSETS: &str = "upload_assets";
pub const SEND_CONFIRMATION: &str = "send_confirmation";
pub const NOTIFY_STAFF: &str = "notify_staff";

type StepResult = Result<PipelineControl, SubmissionError>;

/// `DR-YYYYMMDD-XXXXXXXX`: creation date plus eight random hex digits.
pub fn generate_order_number(created_at: DateTime<Utc>) -> String {
  let random = Uuid::new_v4().simple().to_string();
  format!(
    "DR-{}-{}",
    created_at.format("%Y%m%d"),
    random[..8].to_ascii_uppercase()
  )
}

pub fn photo_storage_path(order_number: &str, index: usize, file_name: &str) -> String {
  format!("orders/{order_number}/{index:03}-{file_name}")
}

pub fn watermark_storage_path(order_number: &str, file_name: &str) -> String {
  format!("orders/{order_number}/watermark-{file_name}")
}

fn stored_order(ctx: &ContextData<SubmissionCtxData>) -> Result<Order, SubmissionError> {
  let data = ctx.read();
  data
    .order
    .clone()
    .filter(|_| data.persisted)
    .ok_or_else(|| PipelineError::Internal("side effect ran before the order was persisted".to_string()).into())
}

fn optional_text(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// --- Required steps ---

pub async fn validate_draft(ctx: ContextData<SubmissionCtxData>) -> StepResult {
  ctx.read().inputs.submission_guard()?;
  Ok(PipelineControl::Continue)
}

pub async fn resolve_package(ctx: ContextData<SubmissionCtxData>, collab: Collaborators) -> StepResult {
  let mut data = ctx.write();
  let tier = data.inputs.package.ok_or(PricingError::PackageUnset)?;
  let package = collab.catalog.package(tier).ok_or(SubmissionError::UnknownPackage(tier))?;

  let mut add_ons = Vec::with_capacity(data.inputs.extras.len());
  for extra in &data.inputs.extras {
    let entry = collab.catalog.add_on(*extra).ok_or(PricingError::UnknownAddOn(*extra))?;
    add_ons.push((*extra, entry));
  }
  data.package_entry = Some(package);
  data.add_on_entries = add_ons;
  Ok(PipelineControl::Continue)
}

/// Recomputes the price from the catalog. Nothing the client displayed is
/// trusted.
pub async fn price_order(
  ctx: ContextData<SubmissionCtxData>,
  collab: Collaborators,
  settings: Arc<SubmissionSettings>,
) -> StepResult {
  let mut data = ctx.write();
  let price = pricing::compute_total_price(&data.inputs, collab.catalog.as_ref(), settings.coupon.as_ref())?;
  data.price = Some(price);
  Ok(PipelineControl::Continue)
}

pub async fn assign_order_number(ctx: ContextData<SubmissionCtxData>, settings: Arc<SubmissionSettings>) -> StepResult {
  let mut data = ctx.write();
  let missing = |what: &str| PipelineError::Internal(format!("{what} was not resolved before building the order"));
  let package_tier = data.inputs.package.ok_or_else(|| missing("package"))?;
  let photo_type = data.inputs.photo_type.ok_or_else(|| missing("photo type"))?;
  let package = data.package_entry.clone().ok_or_else(|| missing("package entry"))?;
  let price = data.price.ok_or_else(|| missing("price"))?;

  let order_id = Uuid::new_v4();
  let created_at = data.created_at;
  let file_count = data.inputs.files.len();
  let express = data.inputs.is_express();

  let order = Order {
    id: order_id,
    order_number: generate_order_number(created_at),
    owner_id: data.caller.user_id,
    package: package_tier,
    package_name: package.name,
    package_unit_price_cents: package.unit_price_cents,
    photo_type,
    file_count: u32::try_from(file_count).map_err(|_| PricingError::Overflow)?,
    image_count: price.unit_count,
    bracketing: BracketingInfo::for_files(photo_type, file_count),
    express,
    subtotal_cents: price.subtotal_cents,
    discount_cents: price.discount_cents,
    total_price_cents: price.total_cents,
    coupon_code: if price.coupon_applied {
      data.inputs.coupon_code.as_deref().map(|c| c.trim().to_ascii_uppercase())
    } else {
      None
    },
    contact_email: optional_text(&data.inputs.contact_email),
    company_name: optional_text(&data.inputs.company_name),
    object_reference: optional_text(&data.inputs.object_reference),
    special_requests: optional_text(&data.inputs.special_requests),
    terms_accepted: data.inputs.terms_accepted,
    settlement_method: data.settlement,
    status: OrderStatus::Received,
    payment_flow_status: data.settlement.initial_payment_flow(),
    payment_status: PaymentStatus::Pending,
    created_at,
  };

  let add_ons = data
    .add_on_entries
    .iter()
    .map(|(extra, entry)| OrderAddOn {
      id: Uuid::new_v4(),
      order_id,
      extra: *extra,
      name: entry.name.clone(),
      unit_price_cents: entry.unit_price_cents,
    })
    .collect();

  data.eta = Some(settings.calendar.calculate_eta(created_at, express));
  data.order = Some(order);
  data.add_ons = add_ons;
  Ok(PipelineControl::Continue)
}

/// The one authoritative write. Order and add-ons land together or not at all.
///
/// An order number collision is retried once under a fresh number.
pub async fn persist_order(ctx: ContextData<SubmissionCtxData>, collab: Collaborators) -> StepResult {
  let (mut order, add_ons) = {
    let data = ctx.read();
    let order = data
      .order
      .clone()
      .ok_or_else(|| PipelineError::Internal("order was not built before persisting".to_string()))?;
    (order, data.add_ons.clone())
  };

  match collab.orders.create_order(&order, &add_ons).await {
    Ok(()) => {}
    Err(StoreError::Duplicate(taken)) => {
      order.order_number = generate_order_number(order.created_at);
      warn!(taken = %taken, order_number = %order.order_number, "Order number collision; retrying once.");
      collab
        .orders
        .create_order(&order, &add_ons)
        .await
        .map_err(SubmissionError::authoritative_write)?;
      if let Some(stored) = ctx.write().order.as_mut() {
        stored.order_number = order.order_number.clone();
      }
    }
    Err(e) => return Err(SubmissionError::authoritative_write(e)),
  }

  info!(
    order_id = %order.id,
    order_number = %order.order_number,
    total_cents = order.total_price_cents,
    "Order persisted."
  );
  ctx.write().persisted = true;
  Ok(PipelineControl::Continue)
}

// --- Best-effort steps ---

fn side_effect_failed(channel: SideChannel, order: &Order, source: anyhow::Error) -> SubmissionError {
  warn!(
    order_id = %order.id,
    order_number = %order.order_number,
    %channel,
    error = %source,
    "Side effect failed; order stands, manual follow-up needed."
  );
  SideEffectError::new(channel, source).into()
}

async fn upload_one(
  collab: &Collaborators,
  order: &Order,
  asset: &AssetRef,
  kind: AssetKind,
  path: String,
) -> anyhow::Result<UploadedAsset> {
  let bytes = tokio::fs::read(&asset.path)
    .await
    .with_context(|| format!("reading staged file {}", asset.path.display()))?;
  let storage_key = collab.blobs.put(bytes, &path).await?;
  let uploaded = UploadedAsset {
    id: Uuid::new_v4(),
    order_id: order.id,
    kind,
    name: asset.name.clone(),
    size_bytes: asset.size_bytes,
    mime_type: asset.mime_type.clone(),
    storage_key,
  };
  collab.orders.record_asset(&uploaded).await?;
  Ok(uploaded)
}

/// Uploads every photo and the watermark independently. The channel counts as
/// degraded if any single asset fails.
pub async fn upload_assets(ctx: ContextData<SubmissionCtxData>, collab: Collaborators) -> StepResult {
  let order = stored_order(&ctx)?;
  let (files, watermark) = {
    let data = ctx.read();
    (data.inputs.files.clone(), data.inputs.watermark_asset.clone())
  };

  let mut jobs: Vec<(AssetRef, AssetKind, String)> = files
    .into_iter()
    .enumerate()
    .map(|(idx, file)| {
      let path = photo_storage_path(&order.order_number, idx + 1, &file.name);
      (file, AssetKind::Photo, path)
    })
    .collect();
  if let Some(watermark) = watermark {
    let path = watermark_storage_path(&order.order_number, &watermark.name);
    jobs.push((watermark, AssetKind::Watermark, path));
  }

  let total = jobs.len();
  let mut failed = Vec::new();
  for (asset, kind, path) in jobs {
    match upload_one(&collab, &order, &asset, kind, path).await {
      Ok(uploaded) => {
        ctx.write().uploaded_assets.push(uploaded);
      }
      Err(e) => {
        warn!(order_number = %order.order_number, asset = %asset.name, error = %e, "Asset upload failed.");
        failed.push(asset.name);
      }
    }
  }

  if failed.is_empty() {
    info!(order_number = %order.order_number, uploaded = total, "All assets uploaded.");
    return Ok(PipelineControl::Continue);
  }
  Err(side_effect_failed(
    SideChannel::AssetUpload,
    &order,
    anyhow!("{} of {} assets failed: {}", failed.len(), total, failed.join(", ")),
  ))
}

fn order_template(
  template: &str,
  subject: String,
  order: &Order,
  add_ons: &[OrderAddOn],
  eta: Option<DateTime<Utc>>,
) -> TemplateData {
  let extras = add_ons.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
  let mut data = TemplateData::new(template, subject)
    .field("order_number", order.order_number.clone())
    .field("package", order.package_name.clone())
    .field("photo_type", order.photo_type.label())
    .field("image_count", order.image_count.to_string())
    .field("extras", extras)
    .field("total", format_cents(order.total_price_cents));
  if let Some(eta) = eta {
    data = data.field("eta", eta.to_rfc3339());
  }
  data
}

/// Sends the customer confirmation, or records a warning when there is no
/// address to send it to.
pub async fn send_confirmation(ctx: ContextData<SubmissionCtxData>, collab: Collaborators) -> StepResult {
  let order = stored_order(&ctx)?;
  let Some(to) = order.contact_email.clone() else {
    warn!(
      order_id = %order.id,
      order_number = %order.order_number,
      "No contact email on order; confirmation email skipped."
    );
    ctx.write().warnings.push(SubmissionWarning::MissingContactEmail);
    return Ok(PipelineControl::Continue);
  };

  let (add_ons, eta) = {
    let data = ctx.read();
    (data.add_ons.clone(), data.eta)
  };
  let template = order_template(
    "order_confirmation",
    format!("Your Darkroom order {}", order.order_number),
    &order,
    &add_ons,
    eta,
  );

  match collab.mailer.send(&to, &template).await {
    Ok(delivery) => {
      info!(order_number = %order.order_number, message_id = %delivery.message_id, "Confirmation email sent.");
      ctx.write().confirmation_message_id = Some(delivery.message_id);
      Ok(PipelineControl::Continue)
    }
    Err(e) => Err(side_effect_failed(SideChannel::ConfirmationEmail, &order, e)),
  }
}

/// Tells staff about the new order under the service principal. The customer
/// profile only enriches the message; its absence never blocks it.
pub async fn notify_staff(
  ctx: ContextData<SubmissionCtxData>,
  collab: Collaborators,
  settings: Arc<SubmissionSettings>,
) -> StepResult {
  let order = stored_order(&ctx)?;
  let (add_ons, eta) = {
    let data = ctx.read();
    (data.add_ons.clone(), data.eta)
  };

  let mut template = order_template(
    "staff_new_order",
    format!("New order {}", order.order_number),
    &order,
    &add_ons,
    eta,
  )
  .field("to", settings.staff_address.clone())
  .field("owner_id", order.owner_id.to_string())
  .field("express", order.express.to_string());
  if let Some(reference) = &order.object_reference {
    template = template.field("object_reference", reference.clone());
  }
  if let Some(requests) = &order.special_requests {
    template = template.field("special_requests", requests.clone());
  }

  match collab.profiles.lookup(order.owner_id).await {
    Ok(Some(profile)) => {
      template = template.field("customer_name", profile.display_name);
      if let Some(company) = profile.company {
        template = template.field("customer_company", company);
      }
    }
    Ok(None) => {
      info!(order_number = %order.order_number, "No customer profile found; notifying staff without it.");
    }
    Err(e) => {
      warn!(order_number = %order.order_number, error = %e, "Profile lookup failed; notifying staff without it.");
    }
  }

  match collab.notifier.notify(&settings.principal, &template).await {
    Ok(delivery) => {
      info!(order_number = %order.order_number, message_id = %delivery.message_id, "Staff notified.");
      ctx.write().staff_message_id = Some(delivery.message_id);
      Ok(PipelineControl::Continue)
    }
    Err(e) => Err(side_effect_failed(SideChannel::StaffNotification, &order, e)),
  }
}
