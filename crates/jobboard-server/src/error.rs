//! Error type for the image routes and its `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use jobboard_api::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error(transparent)]
  Board(#[from] jobboard_core::Error),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::BadRequest(msg) => ApiError::BadRequest(msg).into_response(),
      Error::Board(e) => ApiError::from(e).into_response(),
      Error::Io(e) => {
        tracing::error!(error = %e, "image storage failed");
        let body = json!({ "error": format!("io error: {e}"), "kind": "io_error" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
      }
    }
  }
}
