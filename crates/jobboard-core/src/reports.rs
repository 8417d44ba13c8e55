//! Read-side aggregation over professionals, vacancies, and employers.
//!
//! Everything here is a pure function over slices already loaded from a
//! store. Empty inputs yield empty outputs, never errors.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use uuid::Uuid;

use crate::{employer::Employer, professional::Professional, vacancy::Vacancy};

// ─── Output rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCount {
  pub gender: String,
  pub total:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaCount {
  pub area:       String,
  pub total:      usize,
  /// Share of all professionals carrying this tag, 0–100.
  pub percentage: f64,
}

/// A professional who applied to at least one vacancy in some area, with the
/// distinct names of the employers behind those vacancies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
  pub cedula:    String,
  pub name:      String,
  pub employers: Vec<String>,
}

// ─── Collation ───────────────────────────────────────────────────────────────

/// Sort key that ignores case and accents, keeping `ñ` as its own letter
/// after `n` the way Spanish dictionaries order it.
pub fn collation_key(s: &str) -> String {
  let mut key = String::with_capacity(s.len());
  for c in s.chars().flat_map(char::to_lowercase) {
    match c {
      'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => key.push('a'),
      'é' | 'è' | 'ê' | 'ë' => key.push('e'),
      'í' | 'ì' | 'î' | 'ï' => key.push('i'),
      'ó' | 'ò' | 'ô' | 'ö' | 'õ' => key.push('o'),
      'ú' | 'ù' | 'û' | 'ü' => key.push('u'),
      'ý' | 'ÿ' => key.push('y'),
      'ç' => key.push('c'),
      // '~' sorts after every ASCII letter.
      'ñ' => key.push_str("n~"),
      other => key.push(other),
    }
  }
  key
}

// ─── Aggregations ────────────────────────────────────────────────────────────

/// Professionals tagged with `area`, with their profession list narrowed to
/// that single tag.
pub fn professionals_by_area(professionals: &[Professional], area: &str) -> Vec<Professional> {
  professionals
    .iter()
    .filter(|p| p.has_profession(area))
    .map(|p| Professional {
      professions: p.professions.iter().filter(|t| *t == area).cloned().collect(),
      ..p.clone()
    })
    .collect()
}

/// Professionals who applied to vacancies in `area`, grouped per professional
/// and sorted by name (case- and accent-insensitive).
///
/// Applications whose vacancy or employer no longer resolves are skipped.
pub fn applicants_by_area(
  professionals: &[Professional],
  vacancies: &[Vacancy],
  employers: &[Employer],
  area: &str,
) -> Vec<Applicant> {
  let vacancies: HashMap<Uuid, &Vacancy> =
    vacancies.iter().map(|v| (v.vacancy_id, v)).collect();
  let employers: HashMap<Uuid, &Employer> =
    employers.iter().map(|e| (e.employer_id, e)).collect();

  let mut applicants: Vec<Applicant> = professionals
    .iter()
    .filter_map(|p| {
      let names: BTreeSet<&str> = p
        .applications
        .iter()
        .filter_map(|a| vacancies.get(&a.vacancy_id))
        .filter(|v| v.area == area)
        .filter_map(|v| employers.get(&v.employer_id))
        .map(|e| e.name.as_str())
        .collect();

      (!names.is_empty()).then(|| Applicant {
        cedula:    p.cedula.clone(),
        name:      p.name.clone(),
        employers: names.into_iter().map(str::to_owned).collect(),
      })
    })
    .collect();

  applicants.sort_by_cached_key(|a| (collation_key(&a.name), a.cedula.clone()));
  applicants
}

/// Number of professionals per gender, ordered by gender.
pub fn count_by_gender(professionals: &[Professional]) -> Vec<GenderCount> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for p in professionals {
    *counts.entry(p.gender.as_str()).or_default() += 1;
  }
  counts
    .into_iter()
    .map(|(gender, total)| GenderCount { gender: gender.to_owned(), total })
    .collect()
}

/// Number and percentage of professionals per area tag, largest first.
///
/// A professional repeating a tag is counted once for it. The percentage is
/// relative to the total number of professionals, and 0 when there are none.
pub fn count_by_area(professionals: &[Professional]) -> Vec<AreaCount> {
  let total_professionals = professionals.len();

  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for p in professionals {
    let distinct: BTreeSet<&str> = p.professions.iter().map(String::as_str).collect();
    for area in distinct {
      *counts.entry(area).or_default() += 1;
    }
  }

  let mut rows: Vec<AreaCount> = counts
    .into_iter()
    .map(|(area, total)| AreaCount {
      area: area.to_owned(),
      total,
      percentage: percentage(total, total_professionals),
    })
    .collect();

  // BTreeMap already yields areas ascending; a stable sort keeps that order
  // among equal totals.
  rows.sort_by(|a, b| b.total.cmp(&a.total));
  rows
}

fn percentage(part: usize, whole: usize) -> f64 {
  if whole == 0 {
    0.0
  } else {
    part as f64 / whole as f64 * 100.0
  }
}
