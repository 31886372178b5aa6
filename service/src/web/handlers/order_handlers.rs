// darkroom_service/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use darkroom::models::{AssetRef, SettlementMethod};
use darkroom::services::Caller;
use darkroom::{ConfirmationView, DraftSnapshot, DraftStore};
use serde::Deserialize;
use std::path::{Component, Path};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateOrderRequest {
  pub draft: DraftSnapshot,
  pub settlement_method: SettlementMethod,
}

/// Rebases a client-supplied file path onto the staging directory.
fn stage_asset(staging_root: &Path, asset: &mut AssetRef) -> Result<(), AppError> {
  let escapes = asset.path.as_os_str().is_empty()
    || asset
      .path
      .components()
      .any(|c| !matches!(c, Component::Normal(_)));
  if escapes {
    warn!(file = %asset.name, path = %asset.path.display(), "Rejected staged file path.");
    return Err(AppError::Validation(format!(
      "File '{}' does not reference a staged upload.",
      asset.name
    )));
  }
  asset.path = staging_root.join(&asset.path);
  Ok(())
}

#[instrument(
    name = "handler::create_order",
    skip(app_state, auth_user, body),
    fields(user_id = %auth_user.user_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let CreateOrderRequest {
    mut draft,
    settlement_method,
  } = body.into_inner();

  let staging_root = app_state.config.staging_root.as_path();
  for asset in draft.inputs.files.iter_mut().chain(draft.inputs.watermark_asset.as_mut()) {
    stage_asset(staging_root, asset)?;
  }

  let mut store = DraftStore::from_snapshot(draft, app_state.catalog.clone(), app_state.coupon())?;
  let receipt = app_state
    .submission
    .submit(store.draft(), settlement_method, Caller::new(auth_user.user_id))
    .await?;
  store.finish();

  info!(
    order_number = %receipt.order.order_number,
    degraded = receipt.is_degraded(),
    "Order created."
  );
  let view = ConfirmationView::from_receipt(&receipt, &app_state.calendar());
  Ok(HttpResponse::Created().json(view))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_number = %path.as_str())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_number = path.into_inner();
  let record = app_state
    .orders
    .find_by_number(&order_number)
    .await?
    .filter(|record| record.order.owner_id == auth_user.user_id);

  match record {
    Some(record) => {
      let view = ConfirmationView::from_order(&record.order, &record.add_ons, &app_state.calendar());
      Ok(HttpResponse::Ok().json(view))
    }
    None => {
      warn!("Order {} not found for caller.", order_number);
      Err(AppError::NotFound(format!("Order {} not found.", order_number)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn asset(path: &str) -> AssetRef {
    AssetRef::new("a.jpg", 10, "image/jpeg", path)
  }

  #[test]
  fn staged_paths_are_rebased_and_escapes_rejected() {
    let root = PathBuf::from("/srv/staging");

    let mut ok = asset("session-1/a.jpg");
    stage_asset(&root, &mut ok).unwrap();
    assert_eq!(ok.path, root.join("session-1/a.jpg"));

    for bad in ["../secrets", "/etc/passwd", "", "session/../../x"] {
      let mut a = asset(bad);
      assert!(matches!(stage_asset(&root, &mut a), Err(AppError::Validation(_))), "{bad}");
    }
  }
}
