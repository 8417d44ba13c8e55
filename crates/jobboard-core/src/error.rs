//! Error types for `jobboard-core`.

use thiserror::Error;
use uuid::Uuid;

/// Which natural-key namespace a [`Error::DuplicateKey`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
  Professional,
  Employer,
}

impl std::fmt::Display for KeyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Professional => f.write_str("professional"),
      Self::Employer => f.write_str("employer"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} not found")]
  NotFound(String),

  #[error("a {kind} with cedula {cedula:?} already exists")]
  DuplicateKey { kind: KeyKind, cedula: String },

  #[error("professional {0:?} already has a record")]
  DuplicateRecord(String),

  #[error("professional already applied to vacancy {0}")]
  DuplicateApplication(Uuid),

  #[error("only {limit} applications are allowed per calendar month")]
  QuotaExceeded { limit: usize },

  #[error("validation error: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Stable snake_case name of the error kind, for wire payloads.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::NotFound(_) => "not_found",
      Self::DuplicateKey { .. } => "duplicate_key",
      Self::DuplicateRecord(_) => "duplicate_record",
      Self::DuplicateApplication(_) => "duplicate_application",
      Self::QuotaExceeded { .. } => "quota_exceeded",
      Self::Validation(_) => "validation_error",
      Self::Store(_) => "store_error",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
