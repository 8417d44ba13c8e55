//! Records (CVs), their experiences, and titles/degrees.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, professional::Professional};

/// Media type assumed for inline images that do not declare one.
pub const DEFAULT_INLINE_MEDIA_TYPE: &str = "image/jpeg";

/// One work-history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub company:     String,
  pub description: String,
  pub years:       u32,
}

/// A professional's CV. At most one exists per professional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
  pub record_id:       Uuid,
  pub professional_id: Uuid,
  pub experiences:     Vec<Experience>,
  pub created_at:      DateTime<Utc>,
}

// ─── Titles ──────────────────────────────────────────────────────────────────

/// Where a title's image lives. Only one representation can be authoritative
/// at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TitleImage {
  #[default]
  None,
  /// A file written by the upload endpoint; `path` is relative to the
  /// server root, e.g. `/uploads/<uuid>.png`.
  File { path: String },
  /// Legacy image bytes stored alongside the title.
  Inline { media_type: String, data: Vec<u8> },
}

impl TitleImage {
  pub fn file_path(&self) -> Option<&str> {
    match self {
      Self::File { path } => Some(path),
      _ => None,
    }
  }

  pub fn is_none(&self) -> bool { matches!(self, Self::None) }

  /// Decode a legacy inline image given either as raw base64 or as a
  /// `data:<mime>;base64,<payload>` URL.
  pub fn from_base64(encoded: &str) -> Result<Self> {
    let encoded = encoded.trim();
    let (media_type, payload) = match encoded
      .strip_prefix("data:")
      .and_then(|rest| rest.split_once(";base64,"))
    {
      Some((mime, payload)) if !mime.is_empty() => (mime.to_owned(), payload),
      _ => (DEFAULT_INLINE_MEDIA_TYPE.to_owned(), encoded),
    };

    let data = B64
      .decode(payload)
      .map_err(|e| Error::Validation(format!("invalid base64 image: {e}")))?;
    Ok(Self::Inline { media_type, data })
  }
}

/// A degree or credential attached to a record.
#[derive(Debug, Clone)]
pub struct Title {
  pub title_id:   Uuid,
  pub record_id:  Uuid,
  pub name:       String,
  pub image:      TitleImage,
  pub created_at: DateTime<Utc>,
}

/// Title input as carried by [`NewRecord`]. `image_base64` may be raw base64
/// or a `data:<mime>;base64,` URL.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTitle {
  pub name:         String,
  #[serde(default)]
  pub image_base64: Option<String>,
}

/// Input to [`crate::service::JobBoard::create_record`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord {
  pub professional_cedula: String,
  #[serde(default)]
  pub titles:              Vec<NewTitle>,
  #[serde(default)]
  pub experiences:         Vec<Experience>,
}

/// Wire form of a title: image bytes are never inlined, only described.
#[derive(Debug, Clone, Serialize)]
pub struct TitleView {
  pub title_id:         Uuid,
  pub record_id:        Uuid,
  pub name:             String,
  /// Absolute URL of an uploaded image file.
  pub image_url:        Option<String>,
  /// Whether a legacy inline image is stored for this title.
  pub has_inline_image: bool,
  pub created_at:       DateTime<Utc>,
}

impl TitleView {
  /// Build the wire form, resolving file paths against `images_base_url`.
  pub fn new(title: &Title, images_base_url: &str) -> Self {
    let base = images_base_url.trim_end_matches('/');
    Self {
      title_id:         title.title_id,
      record_id:        title.record_id,
      name:             title.name.clone(),
      image_url:        title.image.file_path().map(|p| format!("{base}{p}")),
      has_inline_image: matches!(title.image, TitleImage::Inline { .. }),
      created_at:       title.created_at,
    }
  }
}

/// A record with its professional and titles resolved.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
  #[serde(flatten)]
  pub record:       Record,
  pub professional: Option<Professional>,
  pub titles:       Vec<TitleView>,
}
