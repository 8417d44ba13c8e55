//! Handlers for `/records` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/records` | Body: [`NewRecord`] with nested titles and experiences |
//! | `GET`  | `/records/:id` | Professional and titles embedded |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jobboard_core::{
  record::{NewRecord, RecordView},
  store::JobBoardStore,
};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

/// `POST /records`
///
/// The record and its titles are written together or not at all.
pub async fn create<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewRecord>,
) -> Result<impl IntoResponse, ApiError> {
  let record = state.board.create_record(body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /records/:id`
pub async fn get_one<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RecordView>, ApiError> {
  Ok(Json(state.board.record(id, &state.images_base_url).await?))
}
