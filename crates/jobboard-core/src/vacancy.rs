//! Vacancies (job postings).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::employer::Employer;

/// A job posting owned by exactly one employer. The owner never changes
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacancy {
  pub vacancy_id:   Uuid,
  pub employer_id:  Uuid,
  pub title:        String,
  pub area:         String,
  pub description:  String,
  pub published_at: DateTime<Utc>,
}

/// Input to [`crate::service::JobBoard::create_vacancy`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewVacancy {
  pub title:           String,
  pub area:            String,
  pub description:     String,
  /// Natural key of the owning employer.
  pub employer_cedula: String,
  /// Defaults to the creation time.
  #[serde(default)]
  pub published_at:    Option<DateTime<Utc>>,
}

/// A vacancy with its owning employer resolved. `employer` is `None` only if
/// the reference dangles.
#[derive(Debug, Clone, Serialize)]
pub struct VacancyView {
  #[serde(flatten)]
  pub vacancy:  Vacancy,
  pub employer: Option<Employer>,
}
