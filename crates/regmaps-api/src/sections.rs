//! Handlers for `/sections` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/sections?chapter=<id>` | Required parent filter |
//! | `GET`    | `/api/sections/{id}` | 404 if not found |
//! | `POST`   | `/api/admin/sections` | 201 + created section |
//! | `PUT`    | `/api/admin/sections/{id}` | Partial patch |
//! | `DELETE` | `/api/admin/sections/{id}` | Cascades |

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
  section::{NewSection, Section, SectionPatch},
  store::ContentStore,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
  references,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub chapter: Option<Uuid>,
}

/// `GET /api/sections?chapter=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Section>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let chapter = params.chapter.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: chapter".into())
  })?;
  let sections = state.store.list_sections(chapter).await.map_err(store_err)?;
  Ok(Json(sections))
}

/// `GET /api/sections/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Section>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let section = state
    .store
    .get_section(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("section {id} not found")))?;
  Ok(Json(section))
}

/// `POST /api/admin/sections`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewSection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }

  let section = state.store.create_section(body).await.map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok((StatusCode::CREATED, Json(section)))
}

/// `PUT /api/admin/sections/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<SectionPatch>,
) -> Result<Json<Section>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let section = state
    .store
    .update_section(id, patch)
    .await
    .map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok(Json(section))
}

/// `DELETE /api/admin/sections/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_section(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("section {id} not found")));
  }
  references::invalidate(&state.cache).await;
  Ok(Json(json!({ "deleted": true })))
}
