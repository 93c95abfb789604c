//! HTTP-level integration tests: the real router, an in-memory store.

use std::{path::PathBuf, sync::Arc, time::Duration};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use regmaps_cache::TtlCache;
use regmaps_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, ServerConfig, auth::AdminCredentials, rate_limit::RateLimiter,
};

const PASSWORD: &str = "secret";

async fn make_state() -> AppState<SqliteStore> {
  make_state_with_limit(10).await
}

async fn make_state_with_limit(calculator_limit: u32) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let salt  = SaltString::generate(&mut OsRng);
  let hash  = Argon2::default()
    .hash_password(PASSWORD.as_bytes(), &salt)
    .unwrap()
    .to_string();

  AppState {
    store:   Arc::new(store),
    cache:   TtlCache::new(),
    auth:    Arc::new(AdminCredentials {
      username:      "admin".to_string(),
      password_hash: hash.clone(),
    }),
    limiter: RateLimiter::new(Duration::from_secs(60), calculator_limit),
    config:  Arc::new(ServerConfig {
      host:                   "127.0.0.1".to_string(),
      port:                   8080,
      store_path:             PathBuf::from(":memory:"),
      pdf_dir:                None,
      auth_username:          "admin".to_string(),
      auth_password_hash:     hash,
      calculator_limit,
      calculator_window_secs: 60,
    }),
  }
}

fn auth_header() -> String {
  format!("Basic {}", B64.encode(format!("admin:{PASSWORD}")))
}

async fn send(
  state:  &AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  authed: bool,
  body:   Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if authed {
    builder = builder.header(header::AUTHORIZATION, auth_header());
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  crate::router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap()
    .to_vec()
}

async fn json_body(resp: Response) -> Value {
  serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Create standard → chapter → section → subsection through the admin API;
/// returns the four ids.
async fn seed_tree(state: &AppState<SqliteStore>) -> (Uuid, Uuid, Uuid, Uuid) {
  let resp = send(
    state,
    "POST",
    "/api/admin/standards",
    true,
    Some(json!({ "code": "XYZ", "name": "Test" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let standard = json_body(resp).await;
  let standard_id: Uuid =
    serde_json::from_value(standard["standard_id"].clone()).unwrap();

  let resp = send(
    state,
    "POST",
    "/api/admin/chapters",
    true,
    Some(json!({ "standard_id": standard_id, "code": "01", "title": "Intro" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let chapter = json_body(resp).await;
  let chapter_id: Uuid =
    serde_json::from_value(chapter["chapter_id"].clone()).unwrap();

  let resp = send(
    state,
    "POST",
    "/api/admin/sections",
    true,
    Some(json!({ "chapter_id": chapter_id, "title": "Sec1" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let section = json_body(resp).await;
  let section_id: Uuid =
    serde_json::from_value(section["section_id"].clone()).unwrap();

  let resp = send(
    state,
    "POST",
    "/api/admin/subsections",
    true,
    Some(json!({ "section_id": section_id, "number": "1", "content": "hello" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let subsection = json_body(resp).await;
  let subsection_id: Uuid =
    serde_json::from_value(subsection["subsection_id"].clone()).unwrap();

  (standard_id, chapter_id, section_id, subsection_id)
}

// ─── End-to-end scenarios ────────────────────────────────────────────────────

#[tokio::test]
async fn nested_create_then_chapter_tree() {
  let state = make_state().await;
  let (_, chapter_id, _, _) = seed_tree(&state).await;

  let resp = send(&state, "GET", &format!("/api/chapters/{chapter_id}"), false, None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let detail = json_body(resp).await;
  let sections = detail["sections"].as_array().unwrap();
  assert_eq!(sections.len(), 1);
  let subsections = sections[0]["subsections"].as_array().unwrap();
  assert_eq!(subsections.len(), 1);
  assert_eq!(subsections[0]["number"], "1");
}

#[tokio::test]
async fn duplicate_subsection_number_is_409() {
  let state = make_state().await;
  let (_, _, section_id, _) = seed_tree(&state).await;

  let resp = send(
    &state,
    "POST",
    "/api/admin/subsections",
    true,
    Some(json!({ "section_id": section_id, "number": "1", "content": "again" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let body = json_body(resp).await;
  let message = body["error"].as_str().unwrap();
  assert!(message.contains("already exists"), "error: {message}");
}

#[tokio::test]
async fn search_finds_the_standard_by_code() {
  let state = make_state().await;
  seed_tree(&state).await;

  let resp = send(&state, "GET", "/api/search?q=XYZ", false, None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let results = json_body(resp).await;
  let standards = results["standards"].as_array().unwrap();
  assert_eq!(standards.len(), 1);
  let url = standards[0]["url"].as_str().unwrap();
  assert!(url.ends_with("/regmaps/xyz"), "url: {url}");
  assert!(results["total"].as_u64().unwrap() >= 1);
}

// ─── Search validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn short_or_missing_search_query_is_400() {
  let state = make_state().await;

  let resp = send(&state, "GET", "/api/search?q=x", false, None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&state, "GET", "/api/search", false, None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_without_matches_reports_zero_total() {
  let state = make_state().await;
  seed_tree(&state).await;

  let resp = send(&state, "GET", "/api/search?q=nothing-here", false, None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let results = json_body(resp).await;
  assert_eq!(results["total"], 0);
  assert!(results["standards"].as_array().unwrap().is_empty());
  assert!(results["subsections"].as_array().unwrap().is_empty());
}

// ─── Reference-tree cache ────────────────────────────────────────────────────

#[tokio::test]
async fn references_are_cached_until_a_write_invalidates() {
  let state = make_state().await;
  seed_tree(&state).await;

  let first = send(&state, "GET", "/api/references", false, None).await;
  assert_eq!(first.status(), StatusCode::OK);
  assert_eq!(first.headers()["x-cache"], "miss");
  let first_body = body_bytes(first).await;

  let second = send(&state, "GET", "/api/references", false, None).await;
  assert_eq!(second.headers()["x-cache"], "hit");
  let second_body = body_bytes(second).await;
  assert_eq!(first_body, second_body);

  // Any tree write drops the cached copy.
  let resp = send(
    &state,
    "POST",
    "/api/admin/standards",
    true,
    Some(json!({ "code": "NEW", "name": "Another" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let third = send(&state, "GET", "/api/references", false, None).await;
  assert_eq!(third.headers()["x-cache"], "miss");
  let tree = json_body(third).await;
  assert_eq!(tree.as_array().unwrap().len(), 2);
}

// ─── Admin gate ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_admin_writes_are_401() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/admin/standards",
    false,
    Some(json!({ "code": "XYZ", "name": "Test" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn wrong_credentials_are_401() {
  let state = make_state().await;

  let bad = format!("Basic {}", B64.encode("admin:wrong"));
  let req = Request::builder()
    .method("DELETE")
    .uri(format!("/api/admin/standards/{}", Uuid::new_v4()))
    .header(header::AUTHORIZATION, bad)
    .body(Body::empty())
    .unwrap();
  let resp = crate::router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_reads_need_no_credentials() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/api/standards", false, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Read endpoint contracts ─────────────────────────────────────────────────

#[tokio::test]
async fn list_without_parent_filter_is_400() {
  let state = make_state().await;

  for uri in ["/api/chapters", "/api/sections", "/api/subsections", "/api/pdfs"] {
    let resp = send(&state, "GET", uri, false, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
  }
}

#[tokio::test]
async fn missing_entities_are_404() {
  let state = make_state().await;
  let id = Uuid::new_v4();

  let resp = send(&state, "GET", &format!("/api/chapters/{id}"), false, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = send(&state, "DELETE", &format!("/api/admin/standards/{id}"), true, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_standard_with_empty_code_is_400() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/admin/standards",
    true,
    Some(json!({ "code": "  ", "name": "Test" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_standard_reports_success_once() {
  let state = make_state().await;
  let (standard_id, _, _, _) = seed_tree(&state).await;

  let resp = send(
    &state,
    "DELETE",
    &format!("/api/admin/standards/{standard_id}"),
    true,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["deleted"], true);

  let resp = send(
    &state,
    "DELETE",
    &format!("/api/admin/standards/{standard_id}"),
    true,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Calculator ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn calculator_computes_the_ratio() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/calculator",
    false,
    Some(json!({ "capital": 100.0, "rwa": 800.0 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  assert_eq!(body["ratio"], 12.5);
  assert_eq!(body["minimum"], 8.0);
  assert_eq!(body["adequate"], true);
}

#[tokio::test]
async fn calculator_rejects_nonpositive_rwa() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/calculator",
    false,
    Some(json!({ "capital": 100.0, "rwa": 0.0 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn calculator_is_rate_limited_per_client() {
  let state = make_state_with_limit(2).await;
  let body = json!({ "capital": 100.0, "rwa": 800.0 });

  for _ in 0..2 {
    let resp = send(&state, "POST", "/api/calculator", false, Some(body.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  let resp = send(&state, "POST", "/api/calculator", false, Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
  assert!(resp.headers().contains_key(header::RETRY_AFTER));

  // A different client address still has budget.
  let req = Request::builder()
    .method("POST")
    .uri("/api/calculator")
    .header(header::CONTENT_TYPE, "application/json")
    .header("x-forwarded-for", "203.0.113.9")
    .body(Body::from(body.to_string()))
    .unwrap();
  let resp = crate::router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notification_inbox_over_http() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/admin/notifications",
    true,
    Some(json!({ "title": "New circular", "body": "Chapter 10 amended" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let published = json_body(resp).await;
  let id = published["notification_id"].as_str().unwrap().to_owned();

  let resp = send(&state, "GET", "/api/notifications/unread", false, None).await;
  assert_eq!(json_body(resp).await["unread"], 1);

  let resp = send(
    &state,
    "POST",
    &format!("/api/notifications/{id}/read"),
    false,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["read"], true);

  let resp = send(&state, "GET", "/api/notifications/unread", false, None).await;
  assert_eq!(json_body(resp).await["unread"], 0);

  let resp = send(
    &state,
    "DELETE",
    &format!("/api/admin/notifications/{id}"),
    true,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Workshops ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn workshop_registration_over_http() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/workshops",
    false,
    Some(json!({
      "workshop": "icaap-fundamentals",
      "name": "Alice",
      "email": "alice@example.com"
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let registration = json_body(resp).await;
  assert_eq!(registration["status"], "pending");
  let id = registration["registration_id"].as_str().unwrap().to_owned();

  // Triage is admin-only.
  let resp = send(&state, "GET", "/api/admin/workshops", false, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/api/admin/workshops", true, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

  let resp = send(
    &state,
    "PUT",
    &format!("/api/admin/workshops/{id}"),
    true,
    Some(json!({ "status": "confirmed" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "confirmed");
}

#[tokio::test]
async fn workshop_registration_validates_the_form() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/workshops",
    false,
    Some(json!({ "workshop": "w", "name": "", "email": "alice@example.com" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(
    &state,
    "POST",
    "/api/workshops",
    false,
    Some(json!({ "workshop": "w", "name": "Alice", "email": "not-an-email" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ─── Chapter PDFs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_metadata_lifecycle() {
  let state = make_state().await;
  let (_, chapter_id, _, _) = seed_tree(&state).await;

  let resp = send(
    &state,
    "POST",
    "/api/admin/pdfs",
    true,
    Some(json!({
      "chapter_id": chapter_id,
      "name": "Consultation paper",
      "url": "https://cdn.example.com/xyz-01.pdf",
      "stored_name": "xyz-01.pdf"
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let pdf = json_body(resp).await;
  let id = pdf["pdf_id"].as_str().unwrap().to_owned();

  let resp = send(
    &state,
    "GET",
    &format!("/api/pdfs?chapter={chapter_id}"),
    false,
    None,
  )
  .await;
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

  // No pdf_dir configured: the row goes, the file phase is skipped.
  let resp = send(&state, "DELETE", &format!("/api/admin/pdfs/{id}"), true, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["deleted"], true);

  let resp = send(&state, "DELETE", &format!("/api/admin/pdfs/{id}"), true, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
