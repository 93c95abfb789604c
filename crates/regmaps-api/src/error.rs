//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every handler funnels failures through [`ApiError`]; the conventional
//! REST mapping lives in one place. Unclassified storage faults are logged
//! server-side and surface as a generic 500 body.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use regmaps_core::Error as DomainError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("too many requests")]
  RateLimited { retry_after: u64 },

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<DomainError> for ApiError {
  fn from(e: DomainError) -> Self {
    match &e {
      DomainError::DuplicateSubsectionNumber { .. } => {
        ApiError::Conflict(e.to_string())
      }
      DomainError::QueryTooShort { .. } => ApiError::BadRequest(e.to_string()),
      DomainError::Storage(_) => ApiError::Internal(e.to_string()),
      // Every remaining variant is a missing entity.
      _ => ApiError::NotFound(e.to_string()),
    }
  }
}

/// Collapse a backend error through the domain error into a status.
pub fn store_err<E: Into<DomainError>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"regmaps-admin\""),
        );
        res
      }
      ApiError::NotFound(msg) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
      }
      ApiError::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
      }
      ApiError::Conflict(msg) => {
        (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
      }
      ApiError::RateLimited { retry_after } => {
        let mut res = (
          StatusCode::TOO_MANY_REQUESTS,
          Json(json!({ "error": "too many requests" })),
        )
          .into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
          res.headers_mut().insert(header::RETRY_AFTER, value);
        }
        res
      }
      ApiError::Internal(msg) => {
        // The real cause stays in the server log; clients get a generic body.
        tracing::error!(target: "regmaps::api", error = %msg, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
