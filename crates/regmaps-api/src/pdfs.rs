//! Handlers for `/pdfs` endpoints — chapter PDF attachment metadata.
//!
//! Upload transport is outside this service; `POST` records metadata for a
//! file that already lives at `url`. Deletion is the observed two-phase
//! mirror: the metadata row goes first, then the backing file is removed
//! best-effort from the configured `pdf_dir` — a failure there is logged and
//! swallowed, never surfaced to the caller.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/pdfs?chapter=<id>` | Ordered by creation time |
//! | `POST`   | `/api/admin/pdfs` | 201 + created record |
//! | `DELETE` | `/api/admin/pdfs/{id}` | Row first, file best-effort |

use std::path::Path as FilePath;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use regmaps_core::{
  chapter::{ChapterPdf, NewChapterPdf},
  store::ContentStore,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub chapter: Option<Uuid>,
}

/// `GET /api/pdfs?chapter=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ChapterPdf>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let chapter = params.chapter.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: chapter".into())
  })?;
  let pdfs = state
    .store
    .list_chapter_pdfs(chapter)
    .await
    .map_err(store_err)?;
  Ok(Json(pdfs))
}

/// `POST /api/admin/pdfs`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewChapterPdf>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  if body.stored_name.trim().is_empty() {
    return Err(ApiError::BadRequest("stored_name must not be empty".into()));
  }

  let pdf = state.store.add_chapter_pdf(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(pdf)))
}

/// `DELETE /api/admin/pdfs/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let pdf = state
    .store
    .delete_chapter_pdf(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("chapter PDF {id} not found")))?;

  // Phase two: best-effort file removal. Only the file name component of
  // `stored_name` is honoured.
  if let Some(dir) = state.config.pdf_dir.as_ref()
    && let Some(file_name) = FilePath::new(&pdf.stored_name).file_name()
  {
    let path = dir.join(file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
      tracing::warn!(
        target: "regmaps::pdfs",
        file = %path.display(),
        error = %e,
        "failed to remove backing file"
      );
    }
  }

  Ok(Json(json!({ "deleted": true })))
}
