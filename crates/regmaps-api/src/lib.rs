//! JSON REST API for regmaps.
//!
//! Exposes an axum [`Router`] backed by any
//! [`regmaps_core::store::ContentStore`]. Public reads live under `/api`;
//! every mutating route lives under `/api/admin` behind the Basic-auth
//! gate in [`auth`], applied uniformly to the whole admin sub-router.
//!
//! | Area | Routes |
//! |------|--------|
//! | content reads | `/api/standards`, `/api/chapters`, `/api/sections`, `/api/subsections`, `/api/footnotes`, `/api/faqs`, `/api/revisions`, `/api/pdfs` |
//! | reference tree | `/api/references` (cached, `X-Cache: hit\|miss`) |
//! | search | `/api/search?q=` |
//! | inbox | `/api/notifications`, `/api/notifications/unread`, `/api/notifications/{id}/read` |
//! | workshops | `/api/workshops` (public register), `/api/admin/workshops` |
//! | calculator | `/api/calculator` (rate limited) |
//! | admin writes | `/api/admin/...` mirroring each entity |

pub mod auth;
pub mod calculator;
pub mod chapters;
pub mod error;
pub mod faqs;
pub mod footnotes;
pub mod notifications;
pub mod pdfs;
pub mod rate_limit;
pub mod references;
pub mod revisions;
pub mod search;
pub mod sections;
pub mod standards;
pub mod subsections;
pub mod workshops;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{delete, get, post, put},
};
use serde::Deserialize;

use regmaps_cache::TtlCache;
use regmaps_core::{store::ContentStore, tree::StandardNode};

use auth::{AdminCredentials, Authenticated};
use rate_limit::RateLimiter;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Directory holding chapter PDF files; when unset, deleting a PDF record
  /// skips the best-effort file removal.
  #[serde(default)]
  pub pdf_dir:            Option<PathBuf>,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Calculator rate limit: requests per window per client.
  #[serde(default = "default_calculator_limit")]
  pub calculator_limit:   u32,
  #[serde(default = "default_calculator_window_secs")]
  pub calculator_window_secs: u64,
}

fn default_calculator_limit() -> u32 { 10 }

fn default_calculator_window_secs() -> u64 { 60 }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContentStore> {
  pub store:   Arc<S>,
  /// The reference-tree cache, injected so admin writes can invalidate it.
  pub cache:   TtlCache<Vec<StandardNode>>,
  pub auth:    Arc<AdminCredentials>,
  pub limiter: RateLimiter,
  pub config:  Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let admin = Router::new()
    // Content tree
    .route("/standards", post(standards::create::<S>))
    .route(
      "/standards/{id}",
      put(standards::update::<S>).delete(standards::remove::<S>),
    )
    .route("/chapters", post(chapters::create::<S>))
    .route(
      "/chapters/{id}",
      put(chapters::update::<S>).delete(chapters::remove::<S>),
    )
    .route("/sections", post(sections::create::<S>))
    .route(
      "/sections/{id}",
      put(sections::update::<S>).delete(sections::remove::<S>),
    )
    .route("/subsections", post(subsections::create::<S>))
    .route(
      "/subsections/{id}",
      put(subsections::update::<S>).delete(subsections::remove::<S>),
    )
    // Subsection-owned records
    .route("/footnotes", post(footnotes::create::<S>))
    .route(
      "/footnotes/{id}",
      put(footnotes::update::<S>).delete(footnotes::remove::<S>),
    )
    .route("/faqs", post(faqs::create::<S>))
    .route("/faqs/{id}", put(faqs::update::<S>).delete(faqs::remove::<S>))
    .route("/revisions", post(revisions::create::<S>))
    .route(
      "/revisions/{id}",
      put(revisions::update::<S>).delete(revisions::remove::<S>),
    )
    // PDF metadata
    .route("/pdfs", post(pdfs::create::<S>))
    .route("/pdfs/{id}", delete(pdfs::remove::<S>))
    // Inbox administration
    .route("/notifications", post(notifications::publish::<S>))
    .route("/notifications/{id}", delete(notifications::remove::<S>))
    // Workshop administration
    .route("/workshops", get(workshops::list::<S>))
    .route(
      "/workshops/{id}",
      put(workshops::set_status::<S>).delete(workshops::remove::<S>),
    )
    .route_layer(middleware::from_extractor_with_state::<
      Authenticated,
      AppState<S>,
    >(state.clone()));

  let api = Router::new()
    // Reads
    .route("/references", get(references::handler::<S>))
    .route("/search", get(search::handler::<S>))
    .route("/standards", get(standards::list::<S>))
    .route("/standards/{id}", get(standards::get_one::<S>))
    .route("/chapters", get(chapters::list::<S>))
    .route("/chapters/{id}", get(chapters::get_one::<S>))
    .route("/sections", get(sections::list::<S>))
    .route("/sections/{id}", get(sections::get_one::<S>))
    .route("/subsections", get(subsections::list::<S>))
    .route("/subsections/{id}", get(subsections::get_one::<S>))
    .route("/footnotes", get(footnotes::list::<S>))
    .route("/faqs", get(faqs::list::<S>))
    .route("/revisions", get(revisions::list::<S>))
    .route("/pdfs", get(pdfs::list::<S>))
    // Inbox
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/unread", get(notifications::unread::<S>))
    .route(
      "/notifications/{id}/read",
      post(notifications::mark_read::<S>),
    )
    // Public workshop registration
    .route("/workshops", post(workshops::register::<S>))
    // Demo calculator
    .route("/calculator", post(calculator::handler::<S>))
    .nest("/admin", admin);

  Router::new().nest("/api", api).with_state(state)
}

#[cfg(test)]
mod tests;
