// darkroom_service/src/web/extractors.rs

use actix_web::{FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// Caller identity taken from the `X-User-ID` header. Stands in for real
/// authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok());

    match user_id {
      Some(user_id) => futures_util::future::ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("AuthenticatedUser extractor: Missing or invalid X-User-ID header.");
        futures_util::future::ready(Err(AppError::Auth(
          "User authentication required. Missing or invalid X-User-ID header.".to_string(),
        )))
      }
    }
  }
}
