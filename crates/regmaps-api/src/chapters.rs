//! Handlers for `/chapters` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/chapters?standard=<id>` | Required parent filter |
//! | `GET`    | `/api/chapters/{id}` | Full nested detail (sections, subsections, PDFs) |
//! | `POST`   | `/api/admin/chapters` | 201; missing standard surfaces as 500 (FK) |
//! | `PUT`    | `/api/admin/chapters/{id}` | Always advances `last_update` |
//! | `DELETE` | `/api/admin/chapters/{id}` | Cascades |

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
  chapter::{Chapter, ChapterPatch, NewChapter},
  store::ContentStore,
  tree::ChapterDetail,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
  references,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub standard: Option<Uuid>,
}

/// `GET /api/chapters?standard=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Chapter>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let standard = params.standard.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: standard".into())
  })?;
  let chapters = state
    .store
    .list_chapters(standard)
    .await
    .map_err(store_err)?;
  Ok(Json(chapters))
}

/// `GET /api/chapters/{id}` — the full nested read behind the chapter page.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ChapterDetail>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let detail = state
    .store
    .chapter_detail(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("chapter {id} not found")))?;
  Ok(Json(detail))
}

/// `POST /api/admin/chapters`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewChapter>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.code.trim().is_empty() {
    return Err(ApiError::BadRequest("code must not be empty".into()));
  }
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }

  let chapter = state.store.create_chapter(body).await.map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok((StatusCode::CREATED, Json(chapter)))
}

/// `PUT /api/admin/chapters/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<ChapterPatch>,
) -> Result<Json<Chapter>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let chapter = state
    .store
    .update_chapter(id, patch)
    .await
    .map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok(Json(chapter))
}

/// `DELETE /api/admin/chapters/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_chapter(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("chapter {id} not found")));
  }
  references::invalidate(&state.cache).await;
  Ok(Json(json!({ "deleted": true })))
}
