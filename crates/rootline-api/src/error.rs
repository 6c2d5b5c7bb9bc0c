//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Duplicate source fingerprint — the body names the existing source.
  #[error("conflict: {0}")]
  Conflict(String),

  /// Input that parsed to nothing importable.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rootline_engine::Error> for ApiError {
  fn from(e: rootline_engine::Error) -> Self {
    use rootline_engine::Error as E;
    match e {
      E::EmptyOrUnparsable => ApiError::Unprocessable(e.to_string()),
      E::DuplicateSource { .. } => ApiError::Conflict(e.to_string()),
      E::InvalidDepth(_) => ApiError::BadRequest(e.to_string()),
      E::PersonNotFound(_) => ApiError::NotFound(e.to_string()),
      E::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => {
        (StatusCode::UNPROCESSABLE_ENTITY, m.clone())
      }
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
