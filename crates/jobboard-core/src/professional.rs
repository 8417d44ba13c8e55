//! Professionals and the applications embedded in them.
//!
//! A professional owns its list of applications; nothing outside the
//! admission path in [`crate::admission`] ever mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vacancy::VacancyView;

/// A dated link from a professional to a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  /// Opaque reference; the vacancy is not required to exist.
  pub vacancy_id: Uuid,
  pub filed_at:   DateTime<Utc>,
}

/// A job-seeking user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
  pub professional_id: Uuid,
  /// Natural key; unique across professionals.
  pub cedula:          String,
  pub name:            String,
  pub gender:          String,
  /// Profession/area tags. Order carries no meaning.
  pub professions:     Vec<String>,
  pub applications:    Vec<Application>,
}

impl Professional {
  pub fn has_profession(&self, area: &str) -> bool {
    self.professions.iter().any(|p| p == area)
  }
}

/// Input to [`crate::service::JobBoard::register_professional`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfessional {
  pub cedula:      String,
  pub name:        String,
  pub gender:      String,
  #[serde(default)]
  pub professions: Vec<String>,
}

/// An application with its vacancy (and that vacancy's employer) resolved.
/// `vacancy` is `None` when the referenced vacancy does not exist.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedApplication {
  pub vacancy_id: Uuid,
  pub filed_at:   DateTime<Utc>,
  pub vacancy:    Option<VacancyView>,
}
