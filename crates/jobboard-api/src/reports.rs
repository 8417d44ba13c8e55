//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/professionals-by-area` | `?area=`; professions narrowed to the area; blank area gives `[]` |
//! | `GET`  | `/reports/applicants-by-area` | `?area=`; employer names per applicant |
//! | `GET`  | `/reports/gender` | |
//! | `GET`  | `/reports/areas` | Totals and percentages per area |

use axum::extract::State;
use jobboard_core::{
  professional::Professional,
  reports::{Applicant, AreaCount, GenderCount},
  store::JobBoardStore,
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Query},
};

/// A missing or blank `area` matches nothing.
#[derive(Debug, Deserialize)]
pub struct AreaParams {
  #[serde(default)]
  pub area: String,
}

impl AreaParams {
  fn area(&self) -> Option<&str> {
    Some(self.area.trim()).filter(|a| !a.is_empty())
  }
}

/// `GET /reports/professionals-by-area?area=<area>`
pub async fn professionals_by_area<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<AreaParams>,
) -> Result<Json<Vec<Professional>>, ApiError> {
  match params.area() {
    Some(area) => Ok(Json(state.board.professionals_by_area(area).await?)),
    None => Ok(Json(Vec::new())),
  }
}

/// `GET /reports/applicants-by-area?area=<area>`
pub async fn applicants_by_area<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<AreaParams>,
) -> Result<Json<Vec<Applicant>>, ApiError> {
  match params.area() {
    Some(area) => Ok(Json(state.board.applicants_by_area(area).await?)),
    None => Ok(Json(Vec::new())),
  }
}

/// `GET /reports/gender`
pub async fn gender<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<GenderCount>>, ApiError> {
  Ok(Json(state.board.count_by_gender().await?))
}

/// `GET /reports/areas`
pub async fn areas<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<AreaCount>>, ApiError> {
  Ok(Json(state.board.count_by_area().await?))
}
