//! Repository traits implemented by storage backends.
//!
//! Each entity gets its own repository trait. All of them share one error
//! type through [`Backend`], so a single backend (e.g.
//! `jobboard-store-sqlite`) can implement every trait and be handed to
//! [`crate::service::JobBoard`] once at startup.

use std::future::Future;

use uuid::Uuid;

use crate::{
  employer::Employer,
  professional::{Application, Professional},
  record::{Record, Title, TitleImage},
  vacancy::Vacancy,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of inserting an entity guarded by a uniqueness constraint.
#[derive(Debug)]
pub enum Insertion<T> {
  Inserted(T),
  /// The unique key (cedula, or the professional of a record) is taken.
  KeyTaken,
}

/// Result of [`ProfessionalRepository::append_application`].
#[derive(Debug)]
pub enum AppendOutcome {
  /// The admission rule accepted; the updated professional is returned.
  Appended(Professional),
  /// The admission rule refused; nothing was written.
  Rejected(crate::Error),
  /// No professional has the given id.
  Missing,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Shared error type for every repository of one backend.
pub trait Backend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

pub trait ProfessionalRepository: Backend {
  fn insert_professional(
    &self,
    professional: Professional,
  ) -> impl Future<Output = Result<Insertion<Professional>, Self::Error>> + Send + '_;

  fn get_professional(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Professional>, Self::Error>> + Send + '_;

  fn find_professional_by_cedula(
    &self,
    cedula: String,
  ) -> impl Future<Output = Result<Option<Professional>, Self::Error>> + Send + '_;

  fn list_professionals(
    &self,
  ) -> impl Future<Output = Result<Vec<Professional>, Self::Error>> + Send + '_;

  /// Atomically read a professional's applications, run `admit` on them, and
  /// append the application it returns.
  ///
  /// The read, the call to `admit`, and the write must behave as one
  /// operation: no other append for the same professional may interleave.
  fn append_application<F>(
    &self,
    professional_id: Uuid,
    admit: F,
  ) -> impl Future<Output = Result<AppendOutcome, Self::Error>> + Send + '_
  where
    F: FnOnce(&[Application]) -> crate::Result<Application> + Send + 'static;
}

pub trait EmployerRepository: Backend {
  fn insert_employer(
    &self,
    employer: Employer,
  ) -> impl Future<Output = Result<Insertion<Employer>, Self::Error>> + Send + '_;

  fn get_employer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Employer>, Self::Error>> + Send + '_;

  fn find_employer_by_cedula(
    &self,
    cedula: String,
  ) -> impl Future<Output = Result<Option<Employer>, Self::Error>> + Send + '_;

  fn list_employers(&self) -> impl Future<Output = Result<Vec<Employer>, Self::Error>> + Send + '_;
}

pub trait VacancyRepository: Backend {
  fn insert_vacancy(
    &self,
    vacancy: Vacancy,
  ) -> impl Future<Output = Result<Vacancy, Self::Error>> + Send + '_;

  fn get_vacancy(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Vacancy>, Self::Error>> + Send + '_;

  /// All vacancies, optionally restricted to one area.
  fn list_vacancies(
    &self,
    area: Option<String>,
  ) -> impl Future<Output = Result<Vec<Vacancy>, Self::Error>> + Send + '_;

  fn list_vacancies_by_employer(
    &self,
    employer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Vacancy>, Self::Error>> + Send + '_;
}

pub trait RecordRepository: Backend {
  /// Insert a record together with its titles, all or nothing.
  /// Returns [`Insertion::KeyTaken`] if the professional already has one.
  fn insert_record(
    &self,
    record: Record,
    titles: Vec<Title>,
  ) -> impl Future<Output = Result<Insertion<Record>, Self::Error>> + Send + '_;

  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  fn find_record_by_professional(
    &self,
    professional_id: Uuid,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;
}

pub trait TitleRepository: Backend {
  fn get_title(&self, id: Uuid) -> impl Future<Output = Result<Option<Title>, Self::Error>> + Send + '_;

  fn list_titles(
    &self,
    record_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Title>, Self::Error>> + Send + '_;

  /// Replace a title's image and return the one it had before, or `None` if
  /// the title does not exist.
  fn replace_title_image(
    &self,
    id: Uuid,
    image: TitleImage,
  ) -> impl Future<Output = Result<Option<TitleImage>, Self::Error>> + Send + '_;
}

/// Every repository at once; implemented for any backend that has them all.
pub trait JobBoardStore:
  ProfessionalRepository + EmployerRepository + VacancyRepository + RecordRepository + TitleRepository
{
}

impl<S> JobBoardStore for S where
  S: ProfessionalRepository
    + EmployerRepository
    + VacancyRepository
    + RecordRepository
    + TitleRepository
{
}
