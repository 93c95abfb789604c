//! HTTP Basic-auth extractor guarding the admin surface.
//!
//! One set of credentials is configured for the whole instance; the password
//! is verified against an argon2 PHC string. The [`Authenticated`] extractor
//! is applied to the entire admin sub-router, so a new admin route cannot
//! forget the check.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use regmaps_core::store::ContentStore;

use crate::{AppState, error::ApiError};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AdminCredentials {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the caller is the admin.
pub struct Authenticated;

/// Verify credentials directly from headers.
pub fn verify_admin(
  headers: &HeaderMap,
  credentials: &AdminCredentials,
) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  if username != credentials.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&credentials.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_admin(&parts.headers, &state.auth)?;
    Ok(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;

  fn credentials(password: &str) -> AdminCredentials {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AdminCredentials { username: "admin".into(), password_hash: hash }
  }

  fn headers_with(value: Option<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(v) = value {
      headers.insert(header::AUTHORIZATION, v.parse().unwrap());
    }
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn correct_credentials() {
    let creds = credentials("secret");
    let headers = headers_with(Some(basic("admin", "secret")));
    assert!(verify_admin(&headers, &creds).is_ok());
  }

  #[test]
  fn wrong_password() {
    let creds = credentials("secret");
    let headers = headers_with(Some(basic("admin", "wrong")));
    assert!(matches!(
      verify_admin(&headers, &creds),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn wrong_username() {
    let creds = credentials("secret");
    let headers = headers_with(Some(basic("intruder", "secret")));
    assert!(matches!(
      verify_admin(&headers, &creds),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let creds = credentials("secret");
    let headers = headers_with(None);
    assert!(matches!(
      verify_admin(&headers, &creds),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let creds = credentials("secret");
    let headers = headers_with(Some("Basic !!!not-base64!!!".into()));
    assert!(matches!(
      verify_admin(&headers, &creds),
      Err(ApiError::Unauthorized)
    ));
  }
}
