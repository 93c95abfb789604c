//! Handler for `GET /api/references` — the cached reference-picker tree.
//!
//! The full tree (every standard with nested chapters, sections, and
//! subsection numbers) is memoized under one fixed key for five minutes.
//! The response reports `X-Cache: hit|miss`. Admin writes to any tree
//! entity invalidate the whole prefix, so the TTL only matters as a
//! backstop (e.g. another instance wrote to the shared store).

use std::time::Duration;

use axum::{
  Json,
  extract::State,
  http::{HeaderName, HeaderValue},
  response::{IntoResponse, Response},
};

use regmaps_cache::TtlCache;
use regmaps_core::{store::ContentStore, tree::StandardNode};

use crate::{
  AppState,
  error::{ApiError, store_err},
};

pub const CACHE_PREFIX: &str = "references/";
pub const CACHE_KEY: &str = "references/tree";
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// `GET /api/references`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  if let Some(tree) = state.cache.get(CACHE_KEY).await {
    return Ok(respond(tree, "hit"));
  }

  let tree = state.store.reference_tree().await.map_err(store_err)?;
  state.cache.set(CACHE_KEY, tree.clone(), CACHE_TTL).await;
  Ok(respond(tree, "miss"))
}

/// Drop every cached reference view. Called by the admin mutation handlers
/// for standards, chapters, sections, and subsections.
pub(crate) async fn invalidate(cache: &TtlCache<Vec<StandardNode>>) {
  cache.invalidate_prefix(CACHE_PREFIX).await;
}

fn respond(tree: Vec<StandardNode>, status: &'static str) -> Response {
  let mut res = Json(tree).into_response();
  res
    .headers_mut()
    .insert(X_CACHE, HeaderValue::from_static(status));
  res
}
