//! Handlers for `/professionals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/professionals` | |
//! | `POST` | `/professionals` | Body: [`NewProfessional`]; 409 on a taken cedula |
//! | `GET`  | `/professionals/:cedula` | 404 if not found |
//! | `GET`  | `/professionals/:cedula/record` | `null` when no record exists |
//! | `GET`  | `/professionals/:cedula/applications` | Vacancies and employers resolved |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jobboard_core::{
  professional::{NewProfessional, Professional, ResolvedApplication},
  record::Record,
  store::JobBoardStore,
};

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /professionals`
pub async fn list<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Professional>>, ApiError> {
  Ok(Json(state.board.professionals().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /professionals`
pub async fn create<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewProfessional>,
) -> Result<impl IntoResponse, ApiError> {
  let professional = state.board.register_professional(body).await?;
  Ok((StatusCode::CREATED, Json(professional)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /professionals/:cedula`
pub async fn get_one<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Professional>, ApiError> {
  Ok(Json(state.board.professional(&cedula).await?))
}

// ─── Relationships ────────────────────────────────────────────────────────────

/// `GET /professionals/:cedula/record`
pub async fn record<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Option<Record>>, ApiError> {
  Ok(Json(state.board.professional_record(&cedula).await?))
}

/// `GET /professionals/:cedula/applications`
pub async fn applications<S: JobBoardStore>(
  State(state): State<ApiState<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Vec<ResolvedApplication>>, ApiError> {
  Ok(Json(state.board.professional_applications(&cedula).await?))
}
