// darkroom_service/src/web/handlers/schedule_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct EtaQuery {
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub express: bool,
}

#[instrument(name = "handler::eta", skip(app_state))]
pub async fn eta_handler(
  app_state: web::Data<AppState>,
  query: web::Query<EtaQuery>,
) -> Result<HttpResponse, AppError> {
  let EtaQuery { created_at, express } = query.into_inner();
  let eta = app_state.calendar().calculate_eta(created_at, express);
  debug!(%eta, "ETA computed.");
  Ok(HttpResponse::Ok().json(json!({ "eta": eta })))
}
