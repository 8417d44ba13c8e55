//! Handlers for `/vacancies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/vacancies` | Optional `?area=` |
//! | `POST` | `/vacancies` | Body: [`NewVacancy`]; 404 if the employer is unknown |
//! | `GET`  | `/vacancies/:id` | Employer embedded |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jobboard_core::{
  store::JobBoardStore,
  vacancy::{NewVacancy, Vacancy, VacancyView},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub area: Option<String>,
}

/// `GET /vacancies[?area=<area>]`
pub async fn list<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Vacancy>>, ApiError> {
  Ok(Json(state.board.vacancies(params.area).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /vacancies`
pub async fn create<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewVacancy>,
) -> Result<impl IntoResponse, ApiError> {
  let vacancy = state.board.create_vacancy(body).await?;
  Ok((StatusCode::CREATED, Json(vacancy)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /vacancies/:id`
pub async fn get_one<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<VacancyView>, ApiError> {
  Ok(Json(state.board.vacancy(id).await?))
}
