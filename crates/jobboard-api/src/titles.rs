//! Handler for `GET /titles/:id`.

use axum::extract::State;
use jobboard_core::{record::TitleView, store::JobBoardStore};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

/// `GET /titles/:id`: the title with its image URL resolved.
pub async fn get_one<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TitleView>, ApiError> {
  let title = state.board.title(id).await?;
  Ok(Json(TitleView::new(&title, &state.images_base_url)))
}
