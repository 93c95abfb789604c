//! Handlers for `/notifications` endpoints — the announcements inbox.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/notifications` | Newest first |
//! | `GET`    | `/api/notifications/unread` | `{"unread": n}` |
//! | `POST`   | `/api/notifications/{id}/read` | Marks one entry read |
//! | `POST`   | `/api/admin/notifications` | 201 + published entry |
//! | `DELETE` | `/api/admin/notifications/{id}` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use regmaps_core::{
  notification::{NewNotification, Notification},
  store::ContentStore,
};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

/// `GET /api/notifications`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let inbox = state.store.list_notifications().await.map_err(store_err)?;
  Ok(Json(inbox))
}

/// `GET /api/notifications/unread`
pub async fn unread<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let count = state.store.unread_notifications().await.map_err(store_err)?;
  Ok(Json(json!({ "unread": count })))
}

/// `POST /api/notifications/{id}/read`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let notification = state
    .store
    .mark_notification_read(id)
    .await
    .map_err(store_err)?;
  Ok(Json(notification))
}

/// `POST /api/admin/notifications`
pub async fn publish<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewNotification>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }

  let notification = state
    .store
    .publish_notification(body)
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(notification)))
}

/// `DELETE /api/admin/notifications/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_notification(id)
    .await
    .map_err(store_err)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("notification {id} not found")));
  }
  Ok(Json(json!({ "deleted": true })))
}
