//! JSON REST API for the job board.
//!
//! Exposes an axum [`Router`] backed by a [`JobBoard`] over any
//! [`JobBoardStore`]. Image upload and static file serving live in the server
//! crate.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jobboard_api::api_router(board.clone(), images_base_url))
//! ```

pub mod applications;
pub mod employers;
pub mod error;
pub mod extract;
pub mod professionals;
pub mod records;
pub mod reports;
pub mod titles;
pub mod vacancies;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use jobboard_core::{JobBoard, store::JobBoardStore};

pub use error::ApiError;

/// State shared by every API handler.
pub struct ApiState<S> {
  pub board:           JobBoard<S>,
  /// Prefix joined onto stored image paths when rendering titles.
  pub images_base_url: Arc<str>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      board:           self.board.clone(),
      images_base_url: Arc::clone(&self.images_base_url),
    }
  }
}

/// Build a fully-materialised API router for `board`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(board: JobBoard<S>, images_base_url: impl Into<Arc<str>>) -> Router<()>
where
  S: JobBoardStore + 'static,
{
  let state = ApiState { board, images_base_url: images_base_url.into() };

  Router::new()
    // Professionals
    .route(
      "/professionals",
      get(professionals::list::<S>).post(professionals::create::<S>),
    )
    .route("/professionals/{cedula}", get(professionals::get_one::<S>))
    .route("/professionals/{cedula}/record", get(professionals::record::<S>))
    .route(
      "/professionals/{cedula}/applications",
      get(professionals::applications::<S>),
    )
    // Employers
    .route("/employers", get(employers::list::<S>).post(employers::create::<S>))
    .route("/employers/{cedula}", get(employers::get_one::<S>))
    .route("/employers/{cedula}/vacancies", get(employers::vacancies::<S>))
    // Vacancies
    .route("/vacancies", get(vacancies::list::<S>).post(vacancies::create::<S>))
    .route("/vacancies/{id}", get(vacancies::get_one::<S>))
    // Records and titles
    .route("/records", post(records::create::<S>))
    .route("/records/{id}", get(records::get_one::<S>))
    .route("/titles/{id}", get(titles::get_one::<S>))
    // Applications
    .route("/applications", post(applications::apply::<S>))
    // Reports
    .route(
      "/reports/professionals-by-area",
      get(reports::professionals_by_area::<S>),
    )
    .route("/reports/applicants-by-area", get(reports::applicants_by_area::<S>))
    .route("/reports/gender", get(reports::gender::<S>))
    .route("/reports/areas", get(reports::areas::<S>))
    .with_state(state)
}
