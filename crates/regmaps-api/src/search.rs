//! Handler for `GET /api/search`.
//!
//! The store runs four independent, capped, case-insensitive substring
//! queries and the response carries the typed buckets plus the total. A
//! missing or too-short `q` (under two characters, trimmed) is a 400.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;

use regmaps_core::{search::SearchResults, store::ContentStore};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub q: Option<String>,
}

/// `GET /api/search?q=<text>`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  // An absent `q` falls through as empty and fails the length check.
  let q = params.q.unwrap_or_default();
  let results = state.store.search(&q).await.map_err(store_err)?;
  Ok(Json(results))
}
