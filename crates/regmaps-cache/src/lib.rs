//! In-process key→value cache with per-entry TTL.
//!
//! An explicit cache service — `get` / `set` / `invalidate` /
//! `invalidate_prefix` — meant to be injected into handlers rather than
//! reached through a module-level singleton. Expiry is absolute, computed at
//! write time; there is no capacity bound or LRU, which is acceptable for
//! callers with a small, fixed key set (the reference tree uses one key).
//!
//! Each process instance holds its own copy; invalidation does not propagate
//! across instances.

use std::{
  collections::HashMap,
  sync::Arc,
  time::{Duration, Instant},
};

use tokio::sync::RwLock;

struct Entry<T> {
  value:      T,
  expires_at: Instant,
}

/// A cloneable handle to a shared TTL cache.
#[derive(Clone)]
pub struct TtlCache<T> {
  entries: Arc<RwLock<HashMap<String, Entry<T>>>>,
}

impl<T> Default for TtlCache<T> {
  fn default() -> Self {
    Self { entries: Arc::new(RwLock::new(HashMap::new())) }
  }
}

impl<T: Clone> TtlCache<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the cached value if present and not expired. An expired entry
  /// is removed on the way out (lazy eviction — nothing sweeps in the
  /// background).
  pub async fn get(&self, key: &str) -> Option<T> {
    {
      let guard = self.entries.read().await;
      match guard.get(key) {
        Some(entry) if entry.expires_at > Instant::now() => {
          return Some(entry.value.clone());
        }
        Some(_) => {}
        None => return None,
      }
    }

    // Expired: re-check under the write lock before removing, in case a
    // concurrent `set` already refreshed the key.
    let mut guard = self.entries.write().await;
    if let Some(entry) = guard.get(key)
      && entry.expires_at <= Instant::now()
    {
      guard.remove(key);
    }
    None
  }

  /// Store `value` under `key`, expiring `ttl` from now. Overwrites any
  /// previous entry.
  pub async fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
    let entry = Entry { value, expires_at: Instant::now() + ttl };
    let mut guard = self.entries.write().await;
    guard.insert(key.into(), entry);
  }

  /// Drop one key. Returns whether an entry (expired or not) was present.
  pub async fn invalidate(&self, key: &str) -> bool {
    let mut guard = self.entries.write().await;
    guard.remove(key).is_some()
  }

  /// Drop every key starting with `prefix`; returns how many were removed.
  pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
    let mut guard = self.entries.write().await;
    let before = guard.len();
    guard.retain(|key, _| !key.starts_with(prefix));
    before - guard.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn get_returns_what_set_stored() {
    let cache = TtlCache::new();
    cache.set("k", 7u32, Duration::from_secs(60)).await;
    assert_eq!(cache.get("k").await, Some(7));
  }

  #[tokio::test]
  async fn missing_key_is_a_miss() {
    let cache: TtlCache<u32> = TtlCache::new();
    assert_eq!(cache.get("absent").await, None);
  }

  #[tokio::test]
  async fn entries_expire_after_their_ttl() {
    let cache = TtlCache::new();
    cache.set("k", 1u32, Duration::from_millis(20)).await;
    assert_eq!(cache.get("k").await, Some(1));

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(cache.get("k").await, None);
    // The expired entry was evicted, not just hidden.
    assert!(!cache.invalidate("k").await);
  }

  #[tokio::test]
  async fn set_overwrites_and_refreshes_expiry() {
    let cache = TtlCache::new();
    cache.set("k", 1u32, Duration::from_millis(20)).await;
    cache.set("k", 2u32, Duration::from_secs(60)).await;

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(cache.get("k").await, Some(2));
  }

  #[tokio::test]
  async fn invalidate_prefix_drops_matching_keys_only() {
    let cache = TtlCache::new();
    cache.set("references/tree", 1u32, Duration::from_secs(60)).await;
    cache.set("references/flat", 2u32, Duration::from_secs(60)).await;
    cache.set("other", 3u32, Duration::from_secs(60)).await;

    assert_eq!(cache.invalidate_prefix("references/").await, 2);
    assert_eq!(cache.get("references/tree").await, None);
    assert_eq!(cache.get("other").await, Some(3));
  }
}
