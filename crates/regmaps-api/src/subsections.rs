//! Handlers for `/subsections` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/subsections?section=<id>` | Required parent filter |
//! | `GET`    | `/api/subsections/{id}` | Detail incl. footnotes/FAQs/revisions |
//! | `POST`   | `/api/admin/subsections` | 201; duplicate number → 409 |
//! | `PUT`    | `/api/admin/subsections/{id}` | Renumber collisions → 409 |
//! | `DELETE` | `/api/admin/subsections/{id}` | Cascades |

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
  subsection::{NewSubsection, Subsection, SubsectionPatch},
  tree::SubsectionDetail,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
  references,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub section: Option<Uuid>,
}

/// `GET /api/subsections?section=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Subsection>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let section = params.section.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: section".into())
  })?;
  let subsections = state
    .store
    .list_subsections(section)
    .await
    .map_err(store_err)?;
  Ok(Json(subsections))
}

/// `GET /api/subsections/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SubsectionDetail>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let detail = state
    .store
    .subsection_detail(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("subsection {id} not found")))?;
  Ok(Json(detail))
}

/// `POST /api/admin/subsections`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewSubsection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.number.trim().is_empty() {
    return Err(ApiError::BadRequest("number must not be empty".into()));
  }

  let subsection = state
    .store
    .create_subsection(body)
    .await
    .map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok((StatusCode::CREATED, Json(subsection)))
}

/// `PUT /api/admin/subsections/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<SubsectionPatch>,
) -> Result<Json<Subsection>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let subsection = state
    .store
    .update_subsection(id, patch)
    .await
    .map_err(store_err)?;
  references::invalidate(&state.cache).await;
  Ok(Json(subsection))
}

/// `DELETE /api/admin/subsections/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_subsection(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("subsection {id} not found")));
  }
  references::invalidate(&state.cache).await;
  Ok(Json(json!({ "deleted": true })))
}
