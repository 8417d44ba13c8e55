//! [`JobBoard`]: the operations of the job board over any [`JobBoardStore`].
//!
//! Mutations enforce their invariants here (or, for applications, through the
//! store's atomic append); queries are thin reads plus the aggregations in
//! [`crate::reports`].

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  admission::AdmissionPolicy,
  employer::{Employer, NewEmployer},
  error::KeyKind,
  professional::{NewProfessional, Professional, ResolvedApplication},
  record::{NewRecord, Record, RecordView, Title, TitleImage, TitleView},
  reports::{self, Applicant, AreaCount, GenderCount},
  store::{AppendOutcome, Insertion, JobBoardStore},
  vacancy::{NewVacancy, Vacancy, VacancyView},
};

/// The job-board service. Cloning is cheap; the store is shared.
#[derive(Debug)]
pub struct JobBoard<S> {
  store:  Arc<S>,
  policy: AdmissionPolicy,
}

impl<S> Clone for JobBoard<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), policy: self.policy }
  }
}

impl<S: JobBoardStore> JobBoard<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self::with_policy(store, AdmissionPolicy::default())
  }

  pub fn with_policy(store: Arc<S>, policy: AdmissionPolicy) -> Self {
    Self { store, policy }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn policy(&self) -> AdmissionPolicy { self.policy }

  // ── Registration ──────────────────────────────────────────────────────────

  pub async fn register_professional(&self, input: NewProfessional) -> Result<Professional> {
    let cedula = normalize_key(&input.cedula)?;

    if self
      .store
      .find_professional_by_cedula(cedula.clone())
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(Error::DuplicateKey { kind: KeyKind::Professional, cedula });
    }

    let professional = Professional {
      professional_id: Uuid::new_v4(),
      cedula:          cedula.clone(),
      name:            input.name,
      gender:          input.gender,
      professions:     input.professions,
      applications:    Vec::new(),
    };

    match self.store.insert_professional(professional).await.map_err(Error::store)? {
      Insertion::Inserted(p) => {
        info!(professional_id = %p.professional_id, cedula = %p.cedula, "registered professional");
        Ok(p)
      }
      Insertion::KeyTaken => Err(Error::DuplicateKey { kind: KeyKind::Professional, cedula }),
    }
  }

  pub async fn register_employer(&self, input: NewEmployer) -> Result<Employer> {
    let cedula = normalize_key(&input.cedula)?;

    if self
      .store
      .find_employer_by_cedula(cedula.clone())
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(Error::DuplicateKey { kind: KeyKind::Employer, cedula });
    }

    let employer = Employer {
      employer_id: Uuid::new_v4(),
      cedula:      cedula.clone(),
      name:        input.name,
      kind:        input.kind,
    };

    match self.store.insert_employer(employer).await.map_err(Error::store)? {
      Insertion::Inserted(e) => {
        info!(employer_id = %e.employer_id, cedula = %e.cedula, "registered employer");
        Ok(e)
      }
      Insertion::KeyTaken => Err(Error::DuplicateKey { kind: KeyKind::Employer, cedula }),
    }
  }

  // ── Vacancies ─────────────────────────────────────────────────────────────

  pub async fn create_vacancy(&self, input: NewVacancy) -> Result<Vacancy> {
    let employer = self.require_employer(&input.employer_cedula).await?;

    let vacancy = Vacancy {
      vacancy_id:   Uuid::new_v4(),
      employer_id:  employer.employer_id,
      title:        input.title,
      area:         input.area,
      description:  input.description,
      published_at: input.published_at.unwrap_or_else(Utc::now),
    };

    let vacancy = self.store.insert_vacancy(vacancy).await.map_err(Error::store)?;
    info!(vacancy_id = %vacancy.vacancy_id, employer = %employer.cedula, "created vacancy");
    Ok(vacancy)
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// Create a professional's record and its titles in one step.
  ///
  /// Inline images are decoded before anything is written, so a bad payload
  /// leaves no partial record behind.
  pub async fn create_record(&self, input: NewRecord) -> Result<Record> {
    let professional = self.require_professional(&input.professional_cedula).await?;

    if self
      .store
      .find_record_by_professional(professional.professional_id)
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(Error::DuplicateRecord(professional.cedula));
    }

    let now = Utc::now();
    let record = Record {
      record_id:       Uuid::new_v4(),
      professional_id: professional.professional_id,
      experiences:     input.experiences,
      created_at:      now,
    };

    let titles = input
      .titles
      .into_iter()
      .map(|t| {
        let image = match t.image_base64.as_deref() {
          Some(encoded) if !encoded.trim().is_empty() => TitleImage::from_base64(encoded)?,
          _ => TitleImage::None,
        };
        Ok(Title {
          title_id: Uuid::new_v4(),
          record_id: record.record_id,
          name: t.name,
          image,
          created_at: now,
        })
      })
      .collect::<Result<Vec<_>>>()?;
    let title_count = titles.len();

    match self.store.insert_record(record, titles).await.map_err(Error::store)? {
      Insertion::Inserted(record) => {
        info!(
          record_id = %record.record_id,
          cedula = %professional.cedula,
          titles = title_count,
          "created record"
        );
        Ok(record)
      }
      Insertion::KeyTaken => Err(Error::DuplicateRecord(professional.cedula)),
    }
  }

  // ── Applications ──────────────────────────────────────────────────────────

  /// File an application from `professional_id` to `vacancy_id`, dated now in
  /// the server's local time zone.
  ///
  /// The vacancy is not required to exist.
  pub async fn apply_to_vacancy(&self, professional_id: Uuid, vacancy_id: Uuid) -> Result<Professional> {
    self.apply_to_vacancy_at(professional_id, vacancy_id, Local::now()).await
  }

  /// As [`Self::apply_to_vacancy`], with an explicit filing instant. The
  /// month window is taken in `now`'s time zone.
  pub async fn apply_to_vacancy_at<Tz>(
    &self,
    professional_id: Uuid,
    vacancy_id: Uuid,
    now: DateTime<Tz>,
  ) -> Result<Professional>
  where
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync,
  {
    let policy = self.policy;
    let outcome = self
      .store
      .append_application(professional_id, move |existing| {
        policy.admit(existing, vacancy_id, &now)
      })
      .await
      .map_err(Error::store)?;

    match outcome {
      AppendOutcome::Appended(professional) => {
        info!(%professional_id, %vacancy_id, "application filed");
        Ok(professional)
      }
      AppendOutcome::Rejected(e) => {
        warn!(%professional_id, %vacancy_id, reason = %e, "application rejected");
        Err(e)
      }
      AppendOutcome::Missing => Err(Error::NotFound(format!("professional {professional_id}"))),
    }
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  pub async fn professionals(&self) -> Result<Vec<Professional>> {
    self.store.list_professionals().await.map_err(Error::store)
  }

  pub async fn professional(&self, cedula: &str) -> Result<Professional> {
    self.require_professional(cedula).await
  }

  pub async fn employers(&self) -> Result<Vec<Employer>> {
    self.store.list_employers().await.map_err(Error::store)
  }

  pub async fn employer(&self, cedula: &str) -> Result<Employer> {
    self.require_employer(cedula).await
  }

  pub async fn vacancies(&self, area: Option<String>) -> Result<Vec<Vacancy>> {
    debug!(?area, "listing vacancies");
    self.store.list_vacancies(area).await.map_err(Error::store)
  }

  pub async fn vacancy(&self, id: Uuid) -> Result<VacancyView> {
    let vacancy = self
      .store
      .get_vacancy(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("vacancy {id}")))?;
    self.resolve_vacancy(vacancy).await
  }

  pub async fn title(&self, id: Uuid) -> Result<Title> {
    self
      .store
      .get_title(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("title {id}")))
  }

  /// Point a title at a new image, returning the image it had before.
  pub async fn replace_title_image(&self, id: Uuid, image: TitleImage) -> Result<TitleImage> {
    let previous = self
      .store
      .replace_title_image(id, image)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("title {id}")))?;
    info!(title_id = %id, "replaced title image");
    Ok(previous)
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  pub async fn employer_vacancies(&self, cedula: &str) -> Result<Vec<Vacancy>> {
    let employer = self.require_employer(cedula).await?;
    self
      .store
      .list_vacancies_by_employer(employer.employer_id)
      .await
      .map_err(Error::store)
  }

  /// The record of the professional with `cedula`, if they have one.
  pub async fn professional_record(&self, cedula: &str) -> Result<Option<Record>> {
    let professional = self.require_professional(cedula).await?;
    self
      .store
      .find_record_by_professional(professional.professional_id)
      .await
      .map_err(Error::store)
  }

  pub async fn record(&self, id: Uuid, images_base_url: &str) -> Result<RecordView> {
    let record = self
      .store
      .get_record(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("record {id}")))?;

    let professional = self
      .store
      .get_professional(record.professional_id)
      .await
      .map_err(Error::store)?;
    let titles = self
      .store
      .list_titles(record.record_id)
      .await
      .map_err(Error::store)?
      .iter()
      .map(|t| TitleView::new(t, images_base_url))
      .collect();

    Ok(RecordView { record, professional, titles })
  }

  /// Applications of the professional with `cedula`, each with its vacancy
  /// and employer resolved.
  pub async fn professional_applications(&self, cedula: &str) -> Result<Vec<ResolvedApplication>> {
    let professional = self.require_professional(cedula).await?;

    let mut resolved = Vec::with_capacity(professional.applications.len());
    for application in professional.applications {
      let vacancy = match self
        .store
        .get_vacancy(application.vacancy_id)
        .await
        .map_err(Error::store)?
      {
        Some(v) => Some(self.resolve_vacancy(v).await?),
        None => None,
      };
      resolved.push(ResolvedApplication {
        vacancy_id: application.vacancy_id,
        filed_at: application.filed_at,
        vacancy,
      });
    }
    Ok(resolved)
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  pub async fn professionals_by_area(&self, area: &str) -> Result<Vec<Professional>> {
    let professionals = self.professionals().await?;
    Ok(reports::professionals_by_area(&professionals, area))
  }

  pub async fn applicants_by_area(&self, area: &str) -> Result<Vec<Applicant>> {
    let professionals = self.professionals().await?;
    let vacancies = self.vacancies(Some(area.to_owned())).await?;
    let employers = self.employers().await?;
    Ok(reports::applicants_by_area(&professionals, &vacancies, &employers, area))
  }

  pub async fn count_by_gender(&self) -> Result<Vec<GenderCount>> {
    Ok(reports::count_by_gender(&self.professionals().await?))
  }

  pub async fn count_by_area(&self) -> Result<Vec<AreaCount>> {
    Ok(reports::count_by_area(&self.professionals().await?))
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn require_professional(&self, cedula: &str) -> Result<Professional> {
    self
      .store
      .find_professional_by_cedula(cedula.trim().to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("professional with cedula {cedula:?}")))
  }

  async fn require_employer(&self, cedula: &str) -> Result<Employer> {
    self
      .store
      .find_employer_by_cedula(cedula.trim().to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("employer with cedula {cedula:?}")))
  }

  async fn resolve_vacancy(&self, vacancy: Vacancy) -> Result<VacancyView> {
    let employer = self
      .store
      .get_employer(vacancy.employer_id)
      .await
      .map_err(Error::store)?;
    Ok(VacancyView { vacancy, employer })
  }
}

/// Trim a natural key; an empty key is rejected.
fn normalize_key(raw: &str) -> Result<String> {
  let key = raw.trim();
  if key.is_empty() {
    return Err(Error::Validation("cedula must not be empty".into()));
  }
  Ok(key.to_owned())
}
