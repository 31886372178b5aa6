// darkroom_service/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use darkroom::{DraftError, StoreError, SubmissionError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Draft Error: {0}")]
  Draft(#[from] DraftError),

  #[error("Submission Error: {source}")]
  Submission {
    #[from]
    source: SubmissionError,
  },

  #[error("Order Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Draft(e) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
      AppError::Submission { source } => {
        if source.is_customer_fault() {
          HttpResponse::BadRequest().json(json!({"error": source.customer_message()}))
        } else {
          tracing::error!(submission_error = ?source, "Submission failed");
          HttpResponse::InternalServerError().json(json!({"error": source.customer_message()}))
        }
      }
      AppError::Store(_) => HttpResponse::InternalServerError().json(json!({"error": "Order lookup failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
