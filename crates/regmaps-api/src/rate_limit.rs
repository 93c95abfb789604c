//! Sliding-window rate limiter for the public calculator endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-key sliding window over request timestamps. Old entries are pruned on
/// every check, so a bucket never outgrows `max_requests`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
  window:       Duration,
  max_requests: u32,
  buckets:      Arc<DashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
  pub fn new(window: Duration, max_requests: u32) -> Self {
    Self {
      window,
      max_requests,
      buckets: Arc::new(DashMap::new()),
    }
  }

  /// Record one request for `key`; returns whether it is within the limit.
  pub fn allow(&self, key: &str) -> bool {
    let now = Instant::now();
    let window = self.window;

    let mut entry = self.buckets.entry(key.to_owned()).or_default();
    entry.retain(|instant| now.duration_since(*instant) < window);

    if entry.len() as u32 >= self.max_requests {
      return false;
    }

    entry.push(now);
    true
  }

  pub fn retry_after_secs(&self) -> u64 {
    self.window.as_secs().max(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allows_up_to_the_cap_within_a_window() {
    let limiter = RateLimiter::new(Duration::from_secs(60), 3);
    assert!(limiter.allow("a"));
    assert!(limiter.allow("a"));
    assert!(limiter.allow("a"));
    assert!(!limiter.allow("a"));
  }

  #[test]
  fn keys_are_limited_independently() {
    let limiter = RateLimiter::new(Duration::from_secs(60), 1);
    assert!(limiter.allow("a"));
    assert!(!limiter.allow("a"));
    assert!(limiter.allow("b"));
  }

  #[test]
  fn window_expiry_refills_the_budget() {
    let limiter = RateLimiter::new(Duration::from_millis(30), 1);
    assert!(limiter.allow("a"));
    assert!(!limiter.allow("a"));

    std::thread::sleep(Duration::from_millis(50));
    assert!(limiter.allow("a"));
  }
}
