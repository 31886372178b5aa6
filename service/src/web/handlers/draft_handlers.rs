// darkroom_service/src/web/handlers/draft_handlers.rs

use actix_web::{web, HttpResponse};
use darkroom::pricing::{format_cents, PriceBreakdown};
use darkroom::{DraftSnapshot, DraftStore, WizardStep};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Derived draft fields, recomputed server-side from the submitted inputs.
#[derive(Serialize, Debug)]
pub struct DraftPreview {
  pub resume_step: WizardStep,
  pub effective_unit_count: u32,
  pub price: Option<PriceBreakdown>,
  pub total_price: Option<String>,
  pub is_valid: bool,
  pub ready_to_submit: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub blocking_issue: Option<String>,
}

#[instrument(name = "handler::preview_draft", skip_all)]
pub async fn preview_draft_handler(
  app_state: web::Data<AppState>,
  body: web::Json<DraftSnapshot>,
) -> Result<HttpResponse, AppError> {
  let store = DraftStore::from_snapshot(body.into_inner(), app_state.catalog.clone(), app_state.coupon())?;
  let draft = store.draft();
  let readiness = draft.inputs().submission_guard();

  let preview = DraftPreview {
    resume_step: store.current_step(),
    effective_unit_count: draft.effective_unit_count(),
    price: draft.price().copied(),
    total_price: draft.price().map(|p| format_cents(p.total_cents)),
    is_valid: draft.is_valid(),
    ready_to_submit: readiness.is_ok(),
    blocking_issue: readiness.err().map(|e| e.to_string()),
  };
  info!(
    resume_step = %preview.resume_step,
    units = preview.effective_unit_count,
    ready = preview.ready_to_submit,
    "Draft preview computed."
  );
  Ok(HttpResponse::Ok().json(preview))
}
