//! Handlers for `/revisions` endpoints.
//!
//! Revisions are append-only by convention — the service never rewrites one
//! on its own — but the admin console can correct or remove an entry, so the
//! full CRUD surface exists.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/revisions?subsection=<id>` | Ordered by `position` |
//! | `POST`   | `/api/admin/revisions` | 201 + created revision |
//! | `PUT`    | `/api/admin/revisions/{id}` | Partial patch |
//! | `DELETE` | `/api/admin/revisions/{id}` | |

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
  store::ContentStore,
  subsection::{NewRevision, Revision, RevisionPatch},
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub subsection: Option<Uuid>,
}

/// `GET /api/revisions?subsection=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Revision>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let subsection = params.subsection.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: subsection".into())
  })?;
  let revisions = state
    .store
    .list_revisions(subsection)
    .await
    .map_err(store_err)?;
  Ok(Json(revisions))
}

/// `POST /api/admin/revisions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewRevision>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }

  let revision = state.store.create_revision(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(revision)))
}

/// `PUT /api/admin/revisions/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<RevisionPatch>,
) -> Result<Json<Revision>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let revision = state
    .store
    .update_revision(id, patch)
    .await
    .map_err(store_err)?;
  Ok(Json(revision))
}

/// `DELETE /api/admin/revisions/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_revision(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("revision {id} not found")));
  }
  Ok(Json(json!({ "deleted": true })))
}
