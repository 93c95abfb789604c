//! Handlers for `/standards` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/standards` | All standards, ordered by `position` |
//! | `GET`    | `/api/standards/{id}` | 404 if not found |
//! | `POST`   | `/api/admin/standards` | 201 + created standard |
//! | `PUT`    | `/api/admin/standards/{id}` | Partial patch |
//! | `DELETE` | `/api/admin/standards/{id}` | Cascades down the tree |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use regmaps_core::{
  standard::{NewStandard, Standard, StandardPatch},
  store::ContentStore,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
  references,
};

/// `GET /api/standards`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Standard>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let standards = state.store.list_standards().await.map_err(store_err)?;
  Ok(Json(standards))
}

/// `GET /api/standards/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Standard>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let standard = state
    .store
    .get_standard(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("standard {id} not found")))?;
  Ok(Json(standard))
}

/// `POST /api/admin/standards`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewStandard>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.code.trim().is_empty() {
    return Err(ApiError::BadRequest("code must not be empty".into()));
  }
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }

  let standard = state.store.create_standard(body).await.map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok((StatusCode::CREATED, Json(standard)))
}

/// `PUT /api/admin/standards/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<StandardPatch>,
) -> Result<Json<Standard>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let standard = state
    .store
    .update_standard(id, patch)
    .await
    .map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok(Json(standard))
}

/// `DELETE /api/admin/standards/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_standard(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("standard {id} not found")));
  }
  references::invalidate(&state.cache).await;
  Ok(Json(json!({ "deleted": true })))
}
