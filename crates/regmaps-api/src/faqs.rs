//! Handlers for `/faqs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/faqs?subsection=<id>` | Ordered by `position` |
//! | `POST`   | `/api/admin/faqs` | 201 + created FAQ |
//! | `PUT`    | `/api/admin/faqs/{id}` | Partial patch |
//! | `DELETE` | `/api/admin/faqs/{id}` | |

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
  subsection::{Faq, FaqPatch, NewFaq},
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub subsection: Option<Uuid>,
}

/// `GET /api/faqs?subsection=<id>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Faq>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let subsection = params.subsection.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: subsection".into())
  })?;
  let faqs = state.store.list_faqs(subsection).await.map_err(store_err)?;
  Ok(Json(faqs))
}

/// `POST /api/admin/faqs`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewFaq>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.question.trim().is_empty() {
    return Err(ApiError::BadRequest("question must not be empty".into()));
  }

  let faq = state.store.create_faq(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(faq)))
}

/// `PUT /api/admin/faqs/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<FaqPatch>,
) -> Result<Json<Faq>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let faq = state.store.update_faq(id, patch).await.map_err(store_err)?;
  Ok(Json(faq))
}

/// `DELETE /api/admin/faqs/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state.store.delete_faq(id).await.map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("FAQ {id} not found")));
  }
  Ok(Json(json!({ "deleted": true })))
}
