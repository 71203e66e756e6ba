//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use repairdesk_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("unknown responsible person: {0}")]
  UnknownPerson(Uuid),
}

impl ApiError {
  pub(crate) fn bad_request(e: impl std::fmt::Display) -> Self {
    Self::BadRequest(e.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    match self {
      ApiError::NotFound(_) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
      }
      ApiError::BadRequest(_) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
      }
      ApiError::Validation(e) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message, "fields": e.fields() })),
      )
        .into_response(),
      ApiError::UnknownPerson(_) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message, "fields": ["responsible_person_id"] })),
      )
        .into_response(),
    }
  }
}
