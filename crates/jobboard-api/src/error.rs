//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Board(#[from] jobboard_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    use jobboard_core::Error as E;
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Board(e) => match e {
        E::NotFound(_) => StatusCode::NOT_FOUND,
        E::DuplicateKey { .. } | E::DuplicateRecord(_) | E::DuplicateApplication(_) => {
          StatusCode::CONFLICT
        }
        E::QuotaExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        E::Validation(_) => StatusCode::BAD_REQUEST,
        E::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Board(e) => e.kind(),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
