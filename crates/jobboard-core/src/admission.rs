//! Application admission rules.
//!
//! A professional may never apply twice to the same vacancy, and may file at
//! most [`DEFAULT_MONTHLY_LIMIT`] applications per calendar month. The month
//! is the calendar month of "now" in the caller's time zone; both its first
//! and last day are inclusive.
//!
//! [`AdmissionPolicy::admit`] is pure. Stores run it inside their atomic
//! append operation so the check and the write see the same state.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::{Error, Result, professional::Application};

pub const DEFAULT_MONTHLY_LIMIT: usize = 3;

// ─── Month window ────────────────────────────────────────────────────────────

/// The inclusive range of calendar days making up one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
  pub first: NaiveDate,
  pub last:  NaiveDate,
}

impl MonthWindow {
  /// The month that contains `date`.
  pub fn containing(date: NaiveDate) -> Self {
    let first = date - Days::new(u64::from(date.day0()));
    let last = first + Months::new(1) - Days::new(1);
    Self { first, last }
  }

  pub fn contains_date(&self, date: NaiveDate) -> bool {
    self.first <= date && date <= self.last
  }

  /// Whether `instant`, read as a calendar date in `tz`, falls in the month.
  pub fn contains<Tz: TimeZone>(&self, instant: DateTime<Utc>, tz: &Tz) -> bool {
    self.contains_date(instant.with_timezone(tz).date_naive())
  }
}

// ─── Policy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
  pub monthly_limit: usize,
}

impl Default for AdmissionPolicy {
  fn default() -> Self {
    Self { monthly_limit: DEFAULT_MONTHLY_LIMIT }
  }
}

impl AdmissionPolicy {
  pub fn with_monthly_limit(monthly_limit: usize) -> Self {
    Self { monthly_limit }
  }

  /// Decide whether an application to `vacancy_id` filed at `now` may be
  /// appended to `existing`, and build it if so.
  ///
  /// The duplicate check spans all of `existing`, not just the current month.
  /// The quota counts only applications already present.
  pub fn admit<Tz: TimeZone>(
    &self,
    existing: &[Application],
    vacancy_id: Uuid,
    now: &DateTime<Tz>,
  ) -> Result<Application> {
    if existing.iter().any(|a| a.vacancy_id == vacancy_id) {
      return Err(Error::DuplicateApplication(vacancy_id));
    }

    let tz = now.timezone();
    let window = MonthWindow::containing(now.date_naive());
    let filed_this_month = existing
      .iter()
      .filter(|a| window.contains(a.filed_at, &tz))
      .count();

    if filed_this_month >= self.monthly_limit {
      return Err(Error::QuotaExceeded { limit: self.monthly_limit });
    }

    Ok(Application { vacancy_id, filed_at: now.with_timezone(&Utc) })
  }
}

#[cfg(test)]
mod tests {
  use chrono::FixedOffset;

  use super::*;

  fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  /// Run `admit` and push the result, as a store would.
  fn file(
    policy: &AdmissionPolicy,
    apps: &mut Vec<Application>,
    vacancy: Uuid,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let app = policy.admit(apps, vacancy, &now)?;
    apps.push(app);
    Ok(())
  }

  // ── Window ─────────────────────────────────────────────────────────────────

  #[test]
  fn window_spans_whole_month() {
    let w = MonthWindow::containing(date(2024, 3, 17));
    assert_eq!(w.first, date(2024, 3, 1));
    assert_eq!(w.last, date(2024, 3, 31));
  }

  #[test]
  fn window_handles_leap_february_and_december() {
    assert_eq!(MonthWindow::containing(date(2024, 2, 10)).last, date(2024, 2, 29));
    assert_eq!(MonthWindow::containing(date(2023, 2, 10)).last, date(2023, 2, 28));
    let dec = MonthWindow::containing(date(2024, 12, 31));
    assert_eq!(dec.first, date(2024, 12, 1));
    assert_eq!(dec.last, date(2024, 12, 31));
  }

  #[test]
  fn last_second_of_month_is_inside() {
    let w = MonthWindow::containing(date(2024, 3, 1));
    assert!(w.contains(at(2024, 3, 31, 23, 59, 59), &Utc));
    assert!(w.contains(at(2024, 3, 1, 0, 0, 0), &Utc));
    assert!(!w.contains(at(2024, 4, 1, 0, 0, 0), &Utc));
    assert!(!w.contains(at(2024, 2, 29, 23, 59, 59), &Utc));
  }

  #[test]
  fn window_uses_the_given_time_zone() {
    // 2024-04-01T02:00Z is still March 31st at UTC-05:00.
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let w = MonthWindow::containing(date(2024, 3, 5));
    assert!(w.contains(at(2024, 4, 1, 2, 0, 0), &tz));
    assert!(!w.contains(at(2024, 4, 1, 2, 0, 0), &Utc));
  }

  // ── Duplicates ─────────────────────────────────────────────────────────────

  #[test]
  fn second_application_to_same_vacancy_is_rejected() {
    let policy = AdmissionPolicy::default();
    let mut apps = Vec::new();
    let v = Uuid::new_v4();

    file(&policy, &mut apps, v, at(2024, 3, 5, 9, 0, 0)).unwrap();
    let err = file(&policy, &mut apps, v, at(2024, 3, 5, 9, 0, 1)).unwrap_err();
    assert!(matches!(err, Error::DuplicateApplication(id) if id == v));
  }

  #[test]
  fn duplicate_check_spans_months() {
    let policy = AdmissionPolicy::default();
    let mut apps = Vec::new();
    let v = Uuid::new_v4();

    file(&policy, &mut apps, v, at(2023, 1, 5, 9, 0, 0)).unwrap();
    let err = file(&policy, &mut apps, v, at(2025, 6, 1, 9, 0, 0)).unwrap_err();
    assert!(matches!(err, Error::DuplicateApplication(_)));
  }

  // ── Quota ──────────────────────────────────────────────────────────────────

  #[test]
  fn fourth_application_in_month_is_rejected() {
    let policy = AdmissionPolicy::default();
    let mut apps = Vec::new();

    for day in [5, 10, 20] {
      file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, day, 12, 0, 0)).unwrap();
    }
    let err = file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, 25, 12, 0, 0))
      .unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { limit: 3 }));
    assert_eq!(apps.len(), 3);
  }

  #[test]
  fn next_month_starts_a_fresh_quota() {
    let policy = AdmissionPolicy::default();
    let mut apps = Vec::new();
    let v4 = Uuid::new_v4();

    for day in [5, 10, 20] {
      file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, day, 12, 0, 0)).unwrap();
    }
    assert!(file(&policy, &mut apps, v4, at(2024, 3, 25, 12, 0, 0)).is_err());
    file(&policy, &mut apps, v4, at(2024, 4, 1, 0, 0, 0)).unwrap();
    assert_eq!(apps.len(), 4);
  }

  #[test]
  fn late_night_on_last_day_counts_toward_that_month() {
    let policy = AdmissionPolicy::default();
    let mut apps = Vec::new();

    file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, 2, 8, 0, 0)).unwrap();
    file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, 15, 8, 0, 0)).unwrap();
    file(&policy, &mut apps, Uuid::new_v4(), at(2024, 3, 31, 23, 59, 59)).unwrap();

    // Still March: the quota is full.
    assert!(matches!(
      policy.admit(&apps, Uuid::new_v4(), &at(2024, 3, 31, 23, 59, 59)),
      Err(Error::QuotaExceeded { .. })
    ));
    // April does not see the late-night application.
    assert!(policy.admit(&apps, Uuid::new_v4(), &at(2024, 4, 1, 0, 0, 0)).is_ok());
  }

  #[test]
  fn custom_limit_is_honoured() {
    let policy = AdmissionPolicy::with_monthly_limit(1);
    let mut apps = Vec::new();
    file(&policy, &mut apps, Uuid::new_v4(), at(2024, 5, 1, 0, 0, 0)).unwrap();
    assert!(matches!(
      file(&policy, &mut apps, Uuid::new_v4(), at(2024, 5, 2, 0, 0, 0)),
      Err(Error::QuotaExceeded { limit: 1 })
    ));
  }

  #[test]
  fn admitted_application_is_stamped_in_utc() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let v = Uuid::new_v4();
    let app = AdmissionPolicy::default().admit(&[], v, &now).unwrap();
    assert_eq!(app.vacancy_id, v);
    assert_eq!(app.filed_at, at(2024, 3, 5, 8, 0, 0));
  }
}
