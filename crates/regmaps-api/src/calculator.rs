//! Handler for `POST /api/calculator` — the public capital-adequacy demo.
//!
//! Computes the minimum-capital ratio (CAR) against the 8% floor. The
//! endpoint is anonymous, so it is rate limited per client address with a
//! sliding window; exhausting the window yields 429 with `Retry-After`.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use regmaps_core::store::ContentStore;

use crate::{AppState, error::ApiError};

/// Regulatory floor for the capital ratio, in percent.
pub const MINIMUM_RATIO: f64 = 8.0;

#[derive(Debug, Deserialize)]
pub struct CalculatorInput {
  /// Total eligible capital.
  pub capital: f64,
  /// Risk-weighted assets.
  pub rwa:     f64,
}

#[derive(Debug, Serialize)]
pub struct CalculatorOutput {
  /// Capital ratio in percent, rounded to two decimals.
  pub ratio:    f64,
  pub minimum:  f64,
  pub adequate: bool,
}

/// `POST /api/calculator`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(input): Json<CalculatorInput>,
) -> Result<Json<CalculatorOutput>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let key = client_key(&headers);
  if !state.limiter.allow(&key) {
    return Err(ApiError::RateLimited {
      retry_after: state.limiter.retry_after_secs(),
    });
  }

  if !input.rwa.is_finite() || input.rwa <= 0.0 {
    return Err(ApiError::BadRequest(
      "rwa must be a positive number".into(),
    ));
  }
  if !input.capital.is_finite() || input.capital < 0.0 {
    return Err(ApiError::BadRequest(
      "capital must be a non-negative number".into(),
    ));
  }

  let ratio = round2(input.capital / input.rwa * 100.0);
  Ok(Json(CalculatorOutput {
    ratio,
    minimum: MINIMUM_RATIO,
    adequate: ratio >= MINIMUM_RATIO,
  }))
}

/// Rate-limit key: the first forwarded-for hop, falling back to a shared
/// bucket for direct connections.
fn client_key(headers: &HeaderMap) -> String {
  headers
    .get("x-forwarded-for")
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(',').next())
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .unwrap_or_else(|| "local".to_owned())
}

fn round2(x: f64) -> f64 {
  (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rounds_to_two_decimals() {
    assert_eq!(round2(12.3456), 12.35);
    assert_eq!(round2(8.0), 8.0);
  }

  #[test]
  fn client_key_takes_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "10.0.0.1, 192.168.0.1".parse().unwrap());
    assert_eq!(client_key(&headers), "10.0.0.1");
  }

  #[test]
  fn client_key_falls_back_without_header() {
    assert_eq!(client_key(&HeaderMap::new()), "local");
  }
}
