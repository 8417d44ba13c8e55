//! Handlers for `/employers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/employers` | |
//! | `POST` | `/employers` | Body: `{"cedula":"..","name":"..","kind":"organization"}` |
//! | `GET`  | `/employers/:cedula` | 404 if not found |
//! | `GET`  | `/employers/:cedula/vacancies` | |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jobboard_core::{
  employer::{Employer, NewEmployer},
  store::JobBoardStore,
  vacancy::Vacancy,
};

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

/// `GET /employers`
pub async fn list<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Employer>>, ApiError> {
  Ok(Json(state.board.employers().await?))
}

/// `POST /employers`
pub async fn create<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewEmployer>,
) -> Result<impl IntoResponse, ApiError> {
  let employer = state.board.register_employer(body).await?;
  Ok((StatusCode::CREATED, Json(employer)))
}

/// `GET /employers/:cedula`
pub async fn get_one<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Employer>, ApiError> {
  Ok(Json(state.board.employer(&cedula).await?))
}

/// `GET /employers/:cedula/vacancies`
pub async fn vacancies<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Vec<Vacancy>>, ApiError> {
  Ok(Json(state.board.employer_vacancies(&cedula).await?))
}
