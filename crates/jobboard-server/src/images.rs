//! Title image routes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/titles/:id/image` | Multipart, single field `file`; PNG, JPEG or WEBP |
//! | `GET`  | `/titles/:id/image` | Inline bytes, or 303 to the uploaded file |
//!
//! Uploaded files land in the configured upload directory under a fresh
//! `<uuid><ext>` name and are served back from `/uploads`.

use std::path::{Path as FsPath, PathBuf};

use axum::{
  Json, Router,
  extract::{DefaultBodyLimit, Multipart, Path, State},
  http::{HeaderValue, header},
  response::{IntoResponse, Redirect, Response},
  routing::get,
};
use bytes::Bytes;
use jobboard_core::{Error as BoardError, record::TitleImage, store::JobBoardStore};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppState, error::Error};

/// `Cache-Control` value for served images.
pub const CACHE_CONTROL: &str = "public, max-age=86400";

/// URL prefix under which uploaded files are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Slack on top of the file size limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

const FILE_FIELD: &str = "file";

pub fn routes<S>(state: AppState<S>) -> Router<()>
where
  S: JobBoardStore + 'static,
{
  let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
  Router::new()
    .route(
      "/titles/{id}/image",
      get(serve_inline::<S>)
        .post(upload::<S>)
        .layer(DefaultBodyLimit::max(body_limit)),
    )
    .with_state(state)
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub ok:   bool,
  pub path: String,
  pub size: usize,
  pub mime: String,
}

struct UploadedFile {
  file_name: Option<String>,
  mime:      String,
  data:      Bytes,
}

/// `POST /titles/:id/image`
pub async fn upload<S: JobBoardStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  multipart: Multipart,
) -> Result<Json<UploadResponse>, Error> {
  let id = parse_id(&id)?;
  let file = read_file_field(multipart).await?;

  if !is_allowed_mime(&file.mime) {
    return Err(Error::BadRequest(format!("image type not allowed: {}", file.mime)));
  }
  if file.data.len() > state.config.max_upload_bytes {
    return Err(Error::BadRequest(format!(
      "file exceeds {} bytes",
      state.config.max_upload_bytes
    )));
  }

  // Fail before touching the disk when the title is unknown.
  state.board.title(id).await?;

  let name = format!("{}{}", Uuid::new_v4(), extension(file.file_name.as_deref(), &file.mime));
  let target = state.config.upload_dir.join(&name);
  tokio::fs::create_dir_all(&state.config.upload_dir).await?;
  tokio::fs::write(&target, &file.data).await?;

  let path = format!("{UPLOADS_PREFIX}{name}");
  let previous = match state
    .board
    .replace_title_image(id, TitleImage::File { path: path.clone() })
    .await
  {
    Ok(previous) => previous,
    Err(e) => {
      remove_quietly(&target).await;
      return Err(e.into());
    }
  };

  if let Some(old) = previous.file_path().and_then(|p| stored_file(&state.config.upload_dir, p)) {
    remove_quietly(&old).await;
  }

  info!(title_id = %id, %path, size = file.data.len(), "stored title image");
  Ok(Json(UploadResponse {
    ok: true,
    path,
    size: file.data.len(),
    mime: file.mime,
  }))
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, Error> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| Error::BadRequest(e.body_text()))?
  {
    if field.name() != Some(FILE_FIELD) {
      continue;
    }
    let file_name = field.file_name().map(str::to_owned);
    let mime = field.content_type().unwrap_or_default().to_ascii_lowercase();
    let data = field
      .bytes()
      .await
      .map_err(|e| Error::BadRequest(e.body_text()))?;
    return Ok(UploadedFile { file_name, mime, data });
  }
  Err(Error::BadRequest(format!("missing multipart field `{FILE_FIELD}`")))
}

fn parse_id(raw: &str) -> Result<Uuid, Error> {
  Uuid::parse_str(raw).map_err(|_| Error::BadRequest(format!("invalid title id: {raw}")))
}

fn is_allowed_mime(mime: &str) -> bool {
  matches!(mime, "image/png" | "image/jpeg" | "image/jpg" | "image/webp")
}

/// Lower-cased extension of the client's file name, falling back to one
/// derived from the media type.
fn extension(file_name: Option<&str>, mime: &str) -> String {
  let from_name = file_name
    .and_then(|n| FsPath::new(n).extension())
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));
  match from_name {
    Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
    None => match mime {
      "image/png" => ".png".into(),
      "image/webp" => ".webp".into(),
      _ => ".jpg".into(),
    },
  }
}

/// Map a stored `/uploads/<name>` path back to a file in `upload_dir`.
/// Anything that is not a bare file name under the prefix is ignored.
fn stored_file(upload_dir: &FsPath, path: &str) -> Option<PathBuf> {
  let name = path.strip_prefix(UPLOADS_PREFIX)?;
  let file_name = FsPath::new(name).file_name()?;
  (file_name == name).then(|| upload_dir.join(file_name))
}

async fn remove_quietly(path: &FsPath) {
  match tokio::fs::remove_file(path).await {
    Ok(()) => {}
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
    Err(e) => warn!(path = %path.display(), error = %e, "failed to remove image file"),
  }
}

// ─── Inline ───────────────────────────────────────────────────────────────────

/// `GET /titles/:id/image`
pub async fn serve_inline<S: JobBoardStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Response, Error> {
  let id = parse_id(&id)?;
  match state.board.title(id).await?.image {
    TitleImage::Inline { media_type, data } => {
      let content_type = HeaderValue::from_str(&media_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
      Ok(
        (
          [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
          ],
          data,
        )
          .into_response(),
      )
    }
    TitleImage::File { path } => Ok(Redirect::to(&path).into_response()),
    TitleImage::None => Err(BoardError::NotFound(format!("image for title {id}")).into()),
  }
}
