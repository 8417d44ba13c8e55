//! Handler for `POST /applications`.
//!
//! Body: `{"professional_id":"<uuid>","vacancy_id":"<uuid>"}`. Responds 201
//! with the updated professional, 409 on a repeat application and 422 once
//! the monthly quota is spent.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jobboard_core::store::JobBoardStore;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, extract::Json};

#[derive(Debug, Deserialize)]
pub struct ApplyBody {
  pub professional_id: Uuid,
  pub vacancy_id:      Uuid,
}

/// `POST /applications`
pub async fn apply<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ApplyBody>,
) -> Result<impl IntoResponse, ApiError> {
  let professional = state
    .board
    .apply_to_vacancy(body.professional_id, body.vacancy_id)
    .await?;
  Ok((StatusCode::CREATED, Json(professional)))
}
