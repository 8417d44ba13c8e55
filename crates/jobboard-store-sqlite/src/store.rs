//! [`SqliteStore`]: the SQLite implementation of every job-board repository.

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use jobboard_core::{
  employer::Employer,
  professional::{Application, Professional},
  record::{Record, Title, TitleImage},
  store::{
    AppendOutcome, Backend, EmployerRepository, Insertion, ProfessionalRepository,
    RecordRepository, TitleRepository, VacancyRepository,
  },
  vacancy::Vacancy,
};

use crate::{
  Error, Result,
  encode::{
    EMPLOYER_COLUMNS, ImageColumns, PROFESSIONAL_COLUMNS, RECORD_COLUMNS, RawEmployer, RawProfessional,
    RawRecord, RawTitle, RawVacancy, TITLE_COLUMNS, VACANCY_COLUMNS, decode_title_image,
    encode_applications, encode_dt, encode_employer_kind, encode_experiences, encode_tags,
    encode_title_image, encode_uuid,
  },
  schema::SCHEMA,
};

type RowMapper<R> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>;

/// Whether `e` is a UNIQUE constraint failure.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A job-board store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// run in order on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` with a single text parameter and map at most one row.
  async fn query_opt<R>(&self, sql: String, param: String, map: RowMapper<R>) -> Result<Option<R>>
  where
    R: Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, rusqlite::params![param], map).optional()?))
      .await?;
    Ok(row)
  }

  /// Run `sql` with positional text parameters and map every row.
  async fn query_all<R>(&self, sql: String, params: Vec<String>, map: RowMapper<R>) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

impl Backend for SqliteStore {
  type Error = Error;
}

// ─── Professionals ───────────────────────────────────────────────────────────

impl ProfessionalRepository for SqliteStore {
  async fn insert_professional(&self, professional: Professional) -> Result<Insertion<Professional>> {
    let id_str           = encode_uuid(professional.professional_id);
    let cedula           = professional.cedula.clone();
    let name             = professional.name.clone();
    let gender           = professional.gender.clone();
    let professions_str  = encode_tags(&professional.professions)?;
    let applications_str = encode_applications(&professional.applications)?;

    let inserted = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO professionals (
             professional_id, cedula, name, gender, professions, applications
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, cedula, name, gender, professions_str, applications_str],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(if inserted { Insertion::Inserted(professional) } else { Insertion::KeyTaken })
  }

  async fn get_professional(&self, id: Uuid) -> Result<Option<Professional>> {
    let sql = format!("SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE professional_id = ?1");
    self
      .query_opt(sql, encode_uuid(id), RawProfessional::from_row)
      .await?
      .map(RawProfessional::into_professional)
      .transpose()
  }

  async fn find_professional_by_cedula(&self, cedula: String) -> Result<Option<Professional>> {
    let sql = format!("SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE cedula = ?1");
    self
      .query_opt(sql, cedula, RawProfessional::from_row)
      .await?
      .map(RawProfessional::into_professional)
      .transpose()
  }

  async fn list_professionals(&self) -> Result<Vec<Professional>> {
    let sql = format!("SELECT {PROFESSIONAL_COLUMNS} FROM professionals ORDER BY rowid");
    self
      .query_all(sql, Vec::new(), RawProfessional::from_row)
      .await?
      .into_iter()
      .map(RawProfessional::into_professional)
      .collect()
  }

  async fn append_application<F>(&self, professional_id: Uuid, admit: F) -> Result<AppendOutcome>
  where
    F: FnOnce(&[Application]) -> jobboard_core::Result<Application> + Send + 'static,
  {
    let id_str = encode_uuid(professional_id);
    let select =
      format!("SELECT {PROFESSIONAL_COLUMNS} FROM professionals WHERE professional_id = ?1");

    // Read, decide, and write under one IMMEDIATE transaction so no other
    // writer can slip in between the check and the update.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
          .query_row(&select, rusqlite::params![id_str], RawProfessional::from_row)
          .optional()?;
        let Some(raw) = raw else {
          return Ok(AppendOutcome::Missing);
        };
        let mut professional = raw.into_professional().map_err(Error::into_call_error)?;

        let application = match admit(&professional.applications) {
          Ok(application) => application,
          // Dropping `tx` rolls back; nothing was written.
          Err(rejection) => return Ok(AppendOutcome::Rejected(rejection)),
        };
        professional.applications.push(application);

        let applications_str =
          encode_applications(&professional.applications).map_err(Error::into_call_error)?;
        tx.execute(
          "UPDATE professionals SET applications = ?1 WHERE professional_id = ?2",
          rusqlite::params![applications_str, id_str],
        )?;
        tx.commit()?;

        Ok(AppendOutcome::Appended(professional))
      })
      .await?;

    Ok(outcome)
  }
}

// ─── Employers ───────────────────────────────────────────────────────────────

impl EmployerRepository for SqliteStore {
  async fn insert_employer(&self, employer: Employer) -> Result<Insertion<Employer>> {
    let id_str   = encode_uuid(employer.employer_id);
    let cedula   = employer.cedula.clone();
    let name     = employer.name.clone();
    let kind_str = encode_employer_kind(employer.kind).to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO employers (employer_id, cedula, name, kind) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, cedula, name, kind_str],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(if inserted { Insertion::Inserted(employer) } else { Insertion::KeyTaken })
  }

  async fn get_employer(&self, id: Uuid) -> Result<Option<Employer>> {
    let sql = format!("SELECT {EMPLOYER_COLUMNS} FROM employers WHERE employer_id = ?1");
    self
      .query_opt(sql, encode_uuid(id), RawEmployer::from_row)
      .await?
      .map(RawEmployer::into_employer)
      .transpose()
  }

  async fn find_employer_by_cedula(&self, cedula: String) -> Result<Option<Employer>> {
    let sql = format!("SELECT {EMPLOYER_COLUMNS} FROM employers WHERE cedula = ?1");
    self
      .query_opt(sql, cedula, RawEmployer::from_row)
      .await?
      .map(RawEmployer::into_employer)
      .transpose()
  }

  async fn list_employers(&self) -> Result<Vec<Employer>> {
    let sql = format!("SELECT {EMPLOYER_COLUMNS} FROM employers ORDER BY rowid");
    self
      .query_all(sql, Vec::new(), RawEmployer::from_row)
      .await?
      .into_iter()
      .map(RawEmployer::into_employer)
      .collect()
  }
}

// ─── Vacancies ───────────────────────────────────────────────────────────────

impl VacancyRepository for SqliteStore {
  async fn insert_vacancy(&self, vacancy: Vacancy) -> Result<Vacancy> {
    let id_str          = encode_uuid(vacancy.vacancy_id);
    let employer_id_str = encode_uuid(vacancy.employer_id);
    let title           = vacancy.title.clone();
    let area            = vacancy.area.clone();
    let description     = vacancy.description.clone();
    let published_str   = encode_dt(vacancy.published_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vacancies (
             vacancy_id, employer_id, title, area, description, published_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, employer_id_str, title, area, description, published_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(vacancy)
  }

  async fn get_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>> {
    let sql = format!("SELECT {VACANCY_COLUMNS} FROM vacancies WHERE vacancy_id = ?1");
    self
      .query_opt(sql, encode_uuid(id), RawVacancy::from_row)
      .await?
      .map(RawVacancy::into_vacancy)
      .transpose()
  }

  async fn list_vacancies(&self, area: Option<String>) -> Result<Vec<Vacancy>> {
    let (sql, params) = match area {
      Some(area) => (
        format!("SELECT {VACANCY_COLUMNS} FROM vacancies WHERE area = ?1 ORDER BY rowid"),
        vec![area],
      ),
      None => (format!("SELECT {VACANCY_COLUMNS} FROM vacancies ORDER BY rowid"), Vec::new()),
    };
    self
      .query_all(sql, params, RawVacancy::from_row)
      .await?
      .into_iter()
      .map(RawVacancy::into_vacancy)
      .collect()
  }

  async fn list_vacancies_by_employer(&self, employer_id: Uuid) -> Result<Vec<Vacancy>> {
    let sql =
      format!("SELECT {VACANCY_COLUMNS} FROM vacancies WHERE employer_id = ?1 ORDER BY rowid");
    self
      .query_all(sql, vec![encode_uuid(employer_id)], RawVacancy::from_row)
      .await?
      .into_iter()
      .map(RawVacancy::into_vacancy)
      .collect()
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

impl RecordRepository for SqliteStore {
  async fn insert_record(&self, record: Record, titles: Vec<Title>) -> Result<Insertion<Record>> {
    let id_str              = encode_uuid(record.record_id);
    let professional_id_str = encode_uuid(record.professional_id);
    let experiences_str     = encode_experiences(&record.experiences)?;
    let created_str         = encode_dt(record.created_at);

    let title_rows: Vec<_> = titles
      .iter()
      .map(|t| {
        let (path, media_type, data) = encode_title_image(&t.image);
        (encode_uuid(t.title_id), t.name.clone(), path, media_type, data, encode_dt(t.created_at))
      })
      .collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        match tx.execute(
          "INSERT INTO records (record_id, professional_id, experiences, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, professional_id_str, experiences_str, created_str],
        ) {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => return Ok(false),
          Err(e) => return Err(e.into()),
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO titles (
               title_id, record_id, name, image_path, image_media_type, image_data, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for (title_id, name, path, media_type, data, created_at) in &title_rows {
            stmt.execute(rusqlite::params![
              title_id, id_str, name, path, media_type, data, created_at
            ])?;
          }
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(if inserted { Insertion::Inserted(record) } else { Insertion::KeyTaken })
  }

  async fn get_record(&self, id: Uuid) -> Result<Option<Record>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE record_id = ?1");
    self
      .query_opt(sql, encode_uuid(id), RawRecord::from_row)
      .await?
      .map(RawRecord::into_record)
      .transpose()
  }

  async fn find_record_by_professional(&self, professional_id: Uuid) -> Result<Option<Record>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE professional_id = ?1");
    self
      .query_opt(sql, encode_uuid(professional_id), RawRecord::from_row)
      .await?
      .map(RawRecord::into_record)
      .transpose()
  }
}

// ─── Titles ──────────────────────────────────────────────────────────────────

impl TitleRepository for SqliteStore {
  async fn get_title(&self, id: Uuid) -> Result<Option<Title>> {
    let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE title_id = ?1");
    self
      .query_opt(sql, encode_uuid(id), RawTitle::from_row)
      .await?
      .map(RawTitle::into_title)
      .transpose()
  }

  async fn list_titles(&self, record_id: Uuid) -> Result<Vec<Title>> {
    let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE record_id = ?1 ORDER BY rowid");
    self
      .query_all(sql, vec![encode_uuid(record_id)], RawTitle::from_row)
      .await?
      .into_iter()
      .map(RawTitle::into_title)
      .collect()
  }

  async fn replace_title_image(&self, id: Uuid, image: TitleImage) -> Result<Option<TitleImage>> {
    let id_str = encode_uuid(id);
    let (path, media_type, data) = encode_title_image(&image);

    let previous = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let previous: Option<ImageColumns> = tx
          .query_row(
            "SELECT image_path, image_media_type, image_data FROM titles WHERE title_id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?;
        if previous.is_none() {
          return Ok(None);
        }

        tx.execute(
          "UPDATE titles SET image_path = ?1, image_media_type = ?2, image_data = ?3
           WHERE title_id = ?4",
          rusqlite::params![path, media_type, data, id_str],
        )?;
        tx.commit()?;
        Ok(previous)
      })
      .await?;

    Ok(previous.map(decode_title_image))
  }
}
