//! HTTP server for the job board.
//!
//! Composes the JSON API from [`jobboard_api`] with the title image routes
//! and static serving of uploaded files, over any [`JobBoardStore`].

pub mod error;
pub mod images;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, header},
};
use jobboard_core::{JobBoard, admission::DEFAULT_MONTHLY_LIMIT, store::JobBoardStore};
use serde::Deserialize;
use tower_http::{services::ServeDir, set_header::SetResponseHeader, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOBBOARD_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                      String,
  pub port:                      u16,
  pub store_path:                PathBuf,
  pub upload_dir:                PathBuf,
  /// Prefix joined onto `/uploads/<name>` when rendering image URLs.
  /// Unset means this server's own `http://host:port`.
  pub images_base_url:           Option<String>,
  pub max_upload_bytes:          usize,
  pub monthly_application_limit: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                      "127.0.0.1".to_string(),
      port:                      4000,
      store_path:                PathBuf::from("jobboard.sqlite3"),
      upload_dir:                PathBuf::from("uploads"),
      images_base_url:           None,
      max_upload_bytes:          5 * 1024 * 1024,
      monthly_application_limit: DEFAULT_MONTHLY_LIMIT,
    }
  }
}

impl ServerConfig {
  /// Base URL that image paths are resolved against.
  pub fn images_base_url(&self) -> String {
    match &self.images_base_url {
      Some(url) => url.clone(),
      None => format!("http://{}:{}", self.host, self.port),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers.
pub struct AppState<S> {
  pub board:  JobBoard<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { board: self.board.clone(), config: Arc::clone(&self.config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: JobBoardStore + 'static,
{
  let api = jobboard_api::api_router(state.board.clone(), state.config.images_base_url())
    .merge(images::routes(state.clone()));

  let uploads = SetResponseHeader::overriding(
    ServeDir::new(&state.config.upload_dir),
    header::CACHE_CONTROL,
    HeaderValue::from_static(images::CACHE_CONTROL),
  );

  Router::new()
    .nest("/api", api)
    .nest_service("/uploads", uploads)
    .layer(TraceLayer::new_for_http())
}
