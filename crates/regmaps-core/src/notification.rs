//! Notification — an entry in the site-wide announcements inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published announcement. `read` flips once when a reader opens it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub title:           String,
  pub body:            String,
  /// Server-assigned; the inbox lists newest first.
  pub created_at:      DateTime<Utc>,
  pub read:            bool,
}

/// Input to [`crate::store::ContentStore::publish_notification`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
  pub title: String,
  pub body:  String,
}
