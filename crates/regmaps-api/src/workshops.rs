//! Handlers for workshop registrations.
//!
//! Registration itself is public (the website's sign-up form posts here);
//! triage is admin-only.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/api/workshops` | Public registration, 201 |
//! | `GET`    | `/api/admin/workshops` | Newest first |
//! | `PUT`    | `/api/admin/workshops/{id}` | Body: `{"status": "confirmed"}` |
//! | `DELETE` | `/api/admin/workshops/{id}` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use regmaps_core::{
  store::ContentStore,
  workshop::{NewRegistration, RegistrationStatus, WorkshopRegistration},
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

/// `POST /api/workshops`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewRegistration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  if !body.email.contains('@') {
    return Err(ApiError::BadRequest("email is not valid".into()));
  }

  let registration = state
    .store
    .register_workshop(body)
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(registration)))
}

/// `GET /api/admin/workshops`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<WorkshopRegistration>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let registrations = state.store.list_registrations().await.map_err(store_err)?;
  Ok(Json(registrations))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: RegistrationStatus,
}

/// `PUT /api/admin/workshops/{id}`
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<WorkshopRegistration>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let registration = state
    .store
    .set_registration_status(id, body.status)
    .await
    .map_err(store_err)?;
  Ok(Json(registration))
}

/// `DELETE /api/admin/workshops/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_registration(id)
    .await
    .map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("registration {id} not found")));
  }
  Ok(Json(json!({ "deleted": true })))
}
