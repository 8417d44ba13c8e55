//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! embedded collections (professions, applications, experiences) compact
//! JSON.

use chrono::{DateTime, Utc};
use jobboard_core::{
  employer::{Employer, EmployerKind},
  professional::{Application, Professional},
  record::{DEFAULT_INLINE_MEDIA_TYPE, Experience, Record, Title, TitleImage},
  vacancy::Vacancy,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_employer_kind(k: EmployerKind) -> &'static str {
  match k {
    EmployerKind::Individual => "individual",
    EmployerKind::Organization => "organization",
  }
}

pub fn decode_employer_kind(s: &str) -> Result<EmployerKind> {
  match s {
    "individual" => Ok(EmployerKind::Individual),
    "organization" => Ok(EmployerKind::Organization),
    other => Err(Error::Decode(format!("unknown employer kind: {other:?}"))),
  }
}

// ─── Embedded JSON ───────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> { Ok(serde_json::to_string(tags)?) }

pub fn decode_tags(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

pub fn encode_applications(apps: &[Application]) -> Result<String> {
  Ok(serde_json::to_string(apps)?)
}

pub fn decode_applications(s: &str) -> Result<Vec<Application>> { Ok(serde_json::from_str(s)?) }

pub fn encode_experiences(exps: &[Experience]) -> Result<String> {
  Ok(serde_json::to_string(exps)?)
}

pub fn decode_experiences(s: &str) -> Result<Vec<Experience>> { Ok(serde_json::from_str(s)?) }

// ─── Title image ─────────────────────────────────────────────────────────────

/// Column values `(image_path, image_media_type, image_data)`.
pub type ImageColumns = (Option<String>, Option<String>, Option<Vec<u8>>);

pub fn encode_title_image(image: &TitleImage) -> ImageColumns {
  match image {
    TitleImage::None => (None, None, None),
    TitleImage::File { path } => (Some(path.clone()), None, None),
    TitleImage::Inline { media_type, data } => (None, Some(media_type.clone()), Some(data.clone())),
  }
}

pub fn decode_title_image((path, media_type, data): ImageColumns) -> TitleImage {
  match (path, data) {
    (Some(path), _) => TitleImage::File { path },
    (None, Some(data)) => TitleImage::Inline {
      media_type: media_type.unwrap_or_else(|| DEFAULT_INLINE_MEDIA_TYPE.to_owned()),
      data,
    },
    (None, None) => TitleImage::None,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PROFESSIONAL_COLUMNS: &str =
  "professional_id, cedula, name, gender, professions, applications";

/// Raw strings read directly from a `professionals` row.
pub struct RawProfessional {
  pub professional_id: String,
  pub cedula:          String,
  pub name:            String,
  pub gender:          String,
  pub professions:     String,
  pub applications:    String,
}

impl RawProfessional {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      professional_id: row.get(0)?,
      cedula:          row.get(1)?,
      name:            row.get(2)?,
      gender:          row.get(3)?,
      professions:     row.get(4)?,
      applications:    row.get(5)?,
    })
  }

  pub fn into_professional(self) -> Result<Professional> {
    Ok(Professional {
      professional_id: decode_uuid(&self.professional_id)?,
      cedula:          self.cedula,
      name:            self.name,
      gender:          self.gender,
      professions:     decode_tags(&self.professions)?,
      applications:    decode_applications(&self.applications)?,
    })
  }
}

pub const EMPLOYER_COLUMNS: &str = "employer_id, cedula, name, kind";

pub struct RawEmployer {
  pub employer_id: String,
  pub cedula:      String,
  pub name:        String,
  pub kind:        String,
}

impl RawEmployer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      employer_id: row.get(0)?,
      cedula:      row.get(1)?,
      name:        row.get(2)?,
      kind:        row.get(3)?,
    })
  }

  pub fn into_employer(self) -> Result<Employer> {
    Ok(Employer {
      employer_id: decode_uuid(&self.employer_id)?,
      cedula:      self.cedula,
      name:        self.name,
      kind:        decode_employer_kind(&self.kind)?,
    })
  }
}

pub const VACANCY_COLUMNS: &str =
  "vacancy_id, employer_id, title, area, description, published_at";

pub struct RawVacancy {
  pub vacancy_id:   String,
  pub employer_id:  String,
  pub title:        String,
  pub area:         String,
  pub description:  String,
  pub published_at: String,
}

impl RawVacancy {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      vacancy_id:   row.get(0)?,
      employer_id:  row.get(1)?,
      title:        row.get(2)?,
      area:         row.get(3)?,
      description:  row.get(4)?,
      published_at: row.get(5)?,
    })
  }

  pub fn into_vacancy(self) -> Result<Vacancy> {
    Ok(Vacancy {
      vacancy_id:   decode_uuid(&self.vacancy_id)?,
      employer_id:  decode_uuid(&self.employer_id)?,
      title:        self.title,
      area:         self.area,
      description:  self.description,
      published_at: decode_dt(&self.published_at)?,
    })
  }
}

pub const RECORD_COLUMNS: &str = "record_id, professional_id, experiences, created_at";

pub struct RawRecord {
  pub record_id:       String,
  pub professional_id: String,
  pub experiences:     String,
  pub created_at:      String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:       row.get(0)?,
      professional_id: row.get(1)?,
      experiences:     row.get(2)?,
      created_at:      row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      record_id:       decode_uuid(&self.record_id)?,
      professional_id: decode_uuid(&self.professional_id)?,
      experiences:     decode_experiences(&self.experiences)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const TITLE_COLUMNS: &str =
  "title_id, record_id, name, image_path, image_media_type, image_data, created_at";

pub struct RawTitle {
  pub title_id:   String,
  pub record_id:  String,
  pub name:       String,
  pub image:      ImageColumns,
  pub created_at: String,
}

impl RawTitle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      title_id:   row.get(0)?,
      record_id:  row.get(1)?,
      name:       row.get(2)?,
      image:      (row.get(3)?, row.get(4)?, row.get(5)?),
      created_at: row.get(6)?,
    })
  }

  pub fn into_title(self) -> Result<Title> {
    Ok(Title {
      title_id:   decode_uuid(&self.title_id)?,
      record_id:  decode_uuid(&self.record_id)?,
      name:       self.name,
      image:      decode_title_image(self.image),
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
