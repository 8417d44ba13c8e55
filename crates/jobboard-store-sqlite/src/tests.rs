//! Integration tests for `SqliteStore`, driven through `JobBoard` against an
//! in-memory database.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use jobboard_core::{
  Error, JobBoard,
  employer::{EmployerKind, NewEmployer},
  professional::{NewProfessional, Professional},
  record::{Experience, NewRecord, NewTitle, Record, TitleImage},
  store::{Insertion, ProfessionalRepository, RecordRepository, TitleRepository},
  vacancy::{NewVacancy, Vacancy},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn board() -> JobBoard<SqliteStore> {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  JobBoard::new(Arc::new(store))
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn new_professional(cedula: &str, name: &str, professions: &[&str]) -> NewProfessional {
  NewProfessional {
    cedula:      cedula.into(),
    name:        name.into(),
    gender:      "F".into(),
    professions: professions.iter().map(|s| s.to_string()).collect(),
  }
}

async fn professional(b: &JobBoard<SqliteStore>, cedula: &str) -> Professional {
  b.register_professional(new_professional(cedula, "Ana", &["IT"]))
    .await
    .unwrap()
}

async fn vacancy(b: &JobBoard<SqliteStore>, employer: &str, area: &str) -> Vacancy {
  if b.employer(employer).await.is_err() {
    b.register_employer(NewEmployer {
      cedula: employer.into(),
      name:   format!("Employer {employer}"),
      kind:   EmployerKind::Organization,
    })
    .await
    .unwrap();
  }
  b.create_vacancy(NewVacancy {
    title:           "Developer".into(),
    area:            area.into(),
    description:     "Writes code".into(),
    employer_cedula: employer.into(),
    published_at:    None,
  })
  .await
  .unwrap()
}

fn new_record(cedula: &str) -> NewRecord {
  NewRecord {
    professional_cedula: cedula.into(),
    titles:              vec![
      NewTitle { name: "BSc".into(), image_base64: None },
      NewTitle { name: "MSc".into(), image_base64: Some("data:image/png;base64,AQID".into()) },
    ],
    experiences:         vec![Experience {
      company:     "Acme".into(),
      description: "Backend".into(),
      years:       3,
    }],
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_get_professional() {
  let b = board().await;
  let p = b
    .register_professional(new_professional("  A1 ", "Ana", &["IT", "Design"]))
    .await
    .unwrap();
  assert_eq!(p.cedula, "A1");
  assert!(p.applications.is_empty());

  let fetched = b.professional("A1").await.unwrap();
  assert_eq!(fetched.professional_id, p.professional_id);
  assert_eq!(fetched.professions, vec!["IT".to_string(), "Design".to_string()]);
}

#[tokio::test]
async fn duplicate_professional_after_trimming_is_rejected() {
  let b = board().await;
  b.register_professional(new_professional("A1", "Ana", &[])).await.unwrap();
  let err = b
    .register_professional(new_professional(" A1  ", "Other", &[]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { ref cedula, .. } if cedula == "A1"));
  assert_eq!(b.professionals().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unique_constraint_backs_up_the_existence_check() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let clash = Professional { professional_id: Uuid::new_v4(), ..p };
  let result = b.store().insert_professional(clash).await.unwrap();
  assert!(matches!(result, Insertion::KeyTaken));
}

#[tokio::test]
async fn duplicate_employer_is_rejected() {
  let b = board().await;
  let input = NewEmployer {
    cedula: "E1".into(),
    name:   "Acme".into(),
    kind:   EmployerKind::Individual,
  };
  let e = b.register_employer(input.clone()).await.unwrap();
  assert_eq!(e.kind, EmployerKind::Individual);
  assert!(matches!(
    b.register_employer(input).await.unwrap_err(),
    Error::DuplicateKey { .. }
  ));
}

#[tokio::test]
async fn unknown_lookups_are_not_found() {
  let b = board().await;
  assert!(matches!(b.professional("nobody").await, Err(Error::NotFound(_))));
  assert!(matches!(b.employer("nobody").await, Err(Error::NotFound(_))));
  assert!(matches!(b.vacancy(Uuid::new_v4()).await, Err(Error::NotFound(_))));
  assert!(matches!(b.title(Uuid::new_v4()).await, Err(Error::NotFound(_))));
}

// ─── Vacancies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn vacancy_requires_existing_employer() {
  let b = board().await;
  let err = b
    .create_vacancy(NewVacancy {
      title:           "Dev".into(),
      area:            "IT".into(),
      description:     "".into(),
      employer_cedula: "missing".into(),
      published_at:    None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn vacancy_publication_defaults_to_now_and_resolves_employer() {
  let b = board().await;
  let before = Utc::now();
  let v = vacancy(&b, "E1", "IT").await;
  assert!(v.published_at >= before);

  let view = b.vacancy(v.vacancy_id).await.unwrap();
  assert_eq!(view.employer.unwrap().cedula, "E1");
}

#[tokio::test]
async fn vacancies_filter_by_area_and_employer() {
  let b = board().await;
  vacancy(&b, "E1", "IT").await;
  vacancy(&b, "E1", "Law").await;
  vacancy(&b, "E2", "IT").await;

  assert_eq!(b.vacancies(None).await.unwrap().len(), 3);
  assert_eq!(b.vacancies(Some("IT".into())).await.unwrap().len(), 2);
  assert!(b.vacancies(Some("Art".into())).await.unwrap().is_empty());
  assert_eq!(b.employer_vacancies("E1").await.unwrap().len(), 2);
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_record_with_titles() {
  let b = board().await;
  professional(&b, "A1").await;

  let record = b.create_record(new_record("A1")).await.unwrap();
  assert_eq!(record.experiences.len(), 1);

  let view = b.record(record.record_id, "http://img").await.unwrap();
  assert_eq!(view.professional.unwrap().cedula, "A1");
  assert_eq!(view.titles.len(), 2);
  assert_eq!(view.titles[0].name, "BSc");
  assert!(!view.titles[0].has_inline_image);
  assert!(view.titles[1].has_inline_image);

  let found = b.professional_record("A1").await.unwrap().unwrap();
  assert_eq!(found.record_id, record.record_id);
}

#[tokio::test]
async fn second_record_is_rejected() {
  let b = board().await;
  professional(&b, "A1").await;
  b.create_record(new_record("A1")).await.unwrap();
  let err = b.create_record(new_record("A1")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateRecord(ref c) if c == "A1"));
}

#[tokio::test]
async fn record_for_unknown_professional_is_not_found() {
  let b = board().await;
  assert!(matches!(b.create_record(new_record("ghost")).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn bad_inline_image_writes_nothing() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let mut input = new_record("A1");
  input.titles.push(NewTitle { name: "PhD".into(), image_base64: Some("%%%".into()) });

  assert!(matches!(b.create_record(input).await, Err(Error::Validation(_))));
  assert!(b.store().find_record_by_professional(p.professional_id).await.unwrap().is_none());
}

#[tokio::test]
async fn record_insert_is_all_or_nothing_on_conflict() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  b.create_record(new_record("A1")).await.unwrap();

  let clash = Record {
    record_id:       Uuid::new_v4(),
    professional_id: p.professional_id,
    experiences:     Vec::new(),
    created_at:      Utc::now(),
  };
  let result = b.store().insert_record(clash.clone(), Vec::new()).await.unwrap();
  assert!(matches!(result, Insertion::KeyTaken));
  assert!(b.store().get_record(clash.record_id).await.unwrap().is_none());
}

#[tokio::test]
async fn replacing_title_image_returns_previous_and_clears_inline() {
  let b = board().await;
  professional(&b, "A1").await;
  let record = b.create_record(new_record("A1")).await.unwrap();
  let titles = b.store().list_titles(record.record_id).await.unwrap();
  let msc = titles.iter().find(|t| t.name == "MSc").unwrap();

  let previous = b
    .replace_title_image(msc.title_id, TitleImage::File { path: "/uploads/new.png".into() })
    .await
    .unwrap();
  assert!(matches!(previous, TitleImage::Inline { ref media_type, .. } if media_type == "image/png"));

  let updated = b.title(msc.title_id).await.unwrap();
  assert_eq!(updated.image, TitleImage::File { path: "/uploads/new.png".into() });

  assert!(matches!(
    b.replace_title_image(Uuid::new_v4(), TitleImage::None).await,
    Err(Error::NotFound(_))
  ));
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn applying_twice_to_same_vacancy_is_rejected() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let v = vacancy(&b, "E1", "IT").await;

  let updated = b.apply_to_vacancy(p.professional_id, v.vacancy_id).await.unwrap();
  assert_eq!(updated.applications.len(), 1);
  assert_eq!(updated.applications[0].vacancy_id, v.vacancy_id);

  let err = b.apply_to_vacancy(p.professional_id, v.vacancy_id).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateApplication(id) if id == v.vacancy_id));
}

#[tokio::test]
async fn duplicate_is_rejected_even_months_later() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let v = Uuid::new_v4();

  b.apply_to_vacancy_at(p.professional_id, v, at(2024, 1, 10, 9, 0, 0)).await.unwrap();
  let err = b
    .apply_to_vacancy_at(p.professional_id, v, at(2024, 9, 10, 9, 0, 0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateApplication(_)));
}

#[tokio::test]
async fn quota_scenario_across_months() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let id = p.professional_id;
  let (v1, v2, v3, v4) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  b.apply_to_vacancy_at(id, v1, at(2024, 3, 5, 10, 0, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, v2, at(2024, 3, 10, 10, 0, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, v3, at(2024, 3, 20, 10, 0, 0)).await.unwrap();

  let err = b.apply_to_vacancy_at(id, v4, at(2024, 3, 25, 10, 0, 0)).await.unwrap_err();
  assert!(matches!(err, Error::QuotaExceeded { limit: 3 }));

  let updated = b.apply_to_vacancy_at(id, v4, at(2024, 4, 1, 10, 0, 0)).await.unwrap();
  assert_eq!(updated.applications.len(), 4);

  // Rejections are not persisted.
  assert_eq!(b.professional("A1").await.unwrap().applications.len(), 4);
}

#[tokio::test]
async fn last_second_of_month_counts_toward_that_month() {
  let b = board().await;
  let id = professional(&b, "A1").await.professional_id;

  b.apply_to_vacancy_at(id, Uuid::new_v4(), at(2024, 3, 1, 0, 0, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, Uuid::new_v4(), at(2024, 3, 2, 0, 0, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, Uuid::new_v4(), at(2024, 3, 31, 23, 59, 59)).await.unwrap();

  assert!(matches!(
    b.apply_to_vacancy_at(id, Uuid::new_v4(), at(2024, 3, 31, 23, 59, 59)).await,
    Err(Error::QuotaExceeded { .. })
  ));
  b.apply_to_vacancy_at(id, Uuid::new_v4(), at(2024, 4, 1, 0, 0, 0)).await.unwrap();
}

#[tokio::test]
async fn month_window_follows_the_callers_zone_west_of_utc() {
  let b = board().await;
  let id = professional(&b, "A1").await.professional_id;
  let tz = FixedOffset::west_opt(5 * 3600).unwrap();
  let local = |m, d, h, min| tz.with_ymd_and_hms(2024, m, d, h, min, 0).unwrap();

  b.apply_to_vacancy_at(id, Uuid::new_v4(), local(3, 3, 9, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, Uuid::new_v4(), local(3, 12, 9, 0)).await.unwrap();
  b.apply_to_vacancy_at(id, Uuid::new_v4(), local(3, 28, 9, 0)).await.unwrap();

  // 2024-04-01 03:30 UTC, still March 31 in the caller's zone.
  let late_march = local(3, 31, 22, 30);
  assert_eq!(late_march.with_timezone(&Utc), at(2024, 4, 1, 3, 30, 0));
  assert!(matches!(
    b.apply_to_vacancy_at(id, Uuid::new_v4(), late_march).await,
    Err(Error::QuotaExceeded { limit: 3 })
  ));

  let updated = b.apply_to_vacancy_at(id, Uuid::new_v4(), local(4, 1, 0, 0)).await.unwrap();
  assert_eq!(updated.applications.len(), 4);
  assert_eq!(updated.applications[3].filed_at, at(2024, 4, 1, 5, 0, 0));
}

#[tokio::test]
async fn month_window_follows_the_callers_zone_east_of_utc() {
  let b = board().await;
  let id = professional(&b, "A1").await.professional_id;
  let tz = FixedOffset::east_opt(2 * 3600).unwrap();

  for day in [5, 15, 25] {
    let now = tz.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
    b.apply_to_vacancy_at(id, Uuid::new_v4(), now).await.unwrap();
  }

  // 2024-03-31 23:30 UTC is already April 1 in the caller's zone.
  let early_april = tz.with_ymd_and_hms(2024, 4, 1, 1, 30, 0).unwrap();
  assert_eq!(early_april.with_timezone(&Utc), at(2024, 3, 31, 23, 30, 0));
  b.apply_to_vacancy_at(id, Uuid::new_v4(), early_april).await.unwrap();
}

#[tokio::test]
async fn applying_for_unknown_professional_is_not_found() {
  let b = board().await;
  let err = b.apply_to_vacancy(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn concurrent_applications_never_exceed_the_quota() {
  let b = board().await;
  let id = professional(&b, "A1").await.professional_id;
  let now = at(2024, 6, 15, 12, 0, 0);

  let handles: Vec<_> = (0..10)
    .map(|_| {
      let b = b.clone();
      tokio::spawn(async move { b.apply_to_vacancy_at(id, Uuid::new_v4(), now).await })
    })
    .collect();

  let mut admitted = 0;
  let mut rejected = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => admitted += 1,
      Err(Error::QuotaExceeded { .. }) => rejected += 1,
      Err(other) => panic!("unexpected error: {other}"),
    }
  }
  assert_eq!(admitted, 3);
  assert_eq!(rejected, 7);
  assert_eq!(b.professional("A1").await.unwrap().applications.len(), 3);
}

#[tokio::test]
async fn concurrent_duplicate_applications_admit_once() {
  let b = board().await;
  let id = professional(&b, "A1").await.professional_id;
  let v = Uuid::new_v4();

  let handles: Vec<_> = (0..5)
    .map(|_| {
      let b = b.clone();
      tokio::spawn(async move { b.apply_to_vacancy(id, v).await })
    })
    .collect();

  let mut admitted = 0;
  for handle in handles {
    if handle.await.unwrap().is_ok() {
      admitted += 1;
    }
  }
  assert_eq!(admitted, 1);
}

#[tokio::test]
async fn resolved_applications_include_vacancy_and_employer() {
  let b = board().await;
  let p = professional(&b, "A1").await;
  let v = vacancy(&b, "E1", "IT").await;
  let dangling = Uuid::new_v4();

  b.apply_to_vacancy(p.professional_id, v.vacancy_id).await.unwrap();
  b.apply_to_vacancy(p.professional_id, dangling).await.unwrap();

  let resolved = b.professional_applications("A1").await.unwrap();
  assert_eq!(resolved.len(), 2);
  let first = resolved[0].vacancy.as_ref().unwrap();
  assert_eq!(first.vacancy.vacancy_id, v.vacancy_id);
  assert_eq!(first.employer.as_ref().unwrap().cedula, "E1");
  assert_eq!(resolved[1].vacancy_id, dangling);
  assert!(resolved[1].vacancy.is_none());
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_on_empty_store_are_empty() {
  let b = board().await;
  assert!(b.count_by_area().await.unwrap().is_empty());
  assert!(b.count_by_gender().await.unwrap().is_empty());
  assert!(b.professionals_by_area("IT").await.unwrap().is_empty());
  assert!(b.applicants_by_area("IT").await.unwrap().is_empty());
}

#[tokio::test]
async fn area_report_percentages() {
  let b = board().await;
  b.register_professional(new_professional("1", "Ana", &["IT", "Law"])).await.unwrap();
  b.register_professional(new_professional("2", "Bea", &["IT"])).await.unwrap();

  let rows = b.count_by_area().await.unwrap();
  assert_eq!(rows[0].area, "IT");
  assert_eq!(rows[0].total, 2);
  assert!((rows[0].percentage - 100.0).abs() < 1e-9);
  assert_eq!(rows[1].area, "Law");
  assert!((rows[1].percentage - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn applicants_by_area_joins_through_vacancies() {
  let b = board().await;
  let zoe = b.register_professional(new_professional("1", "Zoe", &["IT"])).await.unwrap();
  let eli = b.register_professional(new_professional("2", "éli", &["IT"])).await.unwrap();
  let it = vacancy(&b, "E1", "IT").await;
  let law = vacancy(&b, "E2", "Law").await;

  b.apply_to_vacancy(zoe.professional_id, it.vacancy_id).await.unwrap();
  b.apply_to_vacancy(eli.professional_id, it.vacancy_id).await.unwrap();
  b.apply_to_vacancy(eli.professional_id, law.vacancy_id).await.unwrap();

  let rows = b.applicants_by_area("IT").await.unwrap();
  assert_eq!(rows.iter().map(|r| r.cedula.as_str()).collect::<Vec<_>>(), vec!["2", "1"]);
  assert_eq!(rows[0].employers, vec!["Employer E1".to_string()]);

  let law_rows = b.applicants_by_area("Law").await.unwrap();
  assert_eq!(law_rows.len(), 1);
  assert_eq!(law_rows[0].employers, vec!["Employer E2".to_string()]);
}
