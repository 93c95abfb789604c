//! Handlers for `/footnotes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/footnotes?subsection=<id>` | Ordered by footnote number |
//! | `POST`   | `/api/admin/footnotes` | 201 + created footnote |
//! | `PUT`    | `/api/admin/footnotes/{id}` | Partial patch |
//! | `DELETE` | `/api/admin/footnotes/{id}` | |

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
  subsection::{Footnote, FootnotePatch, NewFootnote},
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub subsection: Option<Uuid>,
}

/// `GET /api/footnotes?subsection=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Footnote>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let subsection = params.subsection.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: subsection".into())
  })?;
  let footnotes = state
    .store
    .list_footnotes(subsection)
    .await
    .map_err(store_err)?;
  Ok(Json(footnotes))
}

/// `POST /api/admin/footnotes`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewFootnote>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let footnote = state.store.create_footnote(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(footnote)))
}

/// `PUT /api/admin/footnotes/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<FootnotePatch>,
) -> Result<Json<Footnote>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let footnote = state
    .store
    .update_footnote(id, patch)
    .await
    .map_err(store_err)?;
  Ok(Json(footnote))
}

/// `DELETE /api/admin/footnotes/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_footnote(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("footnote {id} not found")));
  }
  Ok(Json(json!({ "deleted": true })))
}
