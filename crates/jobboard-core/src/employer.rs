//! Employers: the individuals and organisations that post vacancies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Legal nature of an employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployerKind {
  #[serde(alias = "INDIVIDUAL", alias = "FISICA")]
  Individual,
  #[serde(alias = "ORGANIZATION", alias = "JURIDICA")]
  Organization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employer {
  pub employer_id: Uuid,
  /// Natural key; unique across employers.
  pub cedula:      String,
  pub name:        String,
  pub kind:        EmployerKind,
}

/// Input to [`crate::service::JobBoard::register_employer`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployer {
  pub cedula: String,
  pub name:   String,
  pub kind:   EmployerKind,
}
