//! Workshop registration — a sign-up for one of the advisory workshops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a registration stands in the admin's triage flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
  #[default]
  Pending,
  Confirmed,
  Cancelled,
}

/// One sign-up, as submitted through the public registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopRegistration {
  pub registration_id: Uuid,
  /// Slug or title of the workshop being registered for.
  pub workshop:        String,
  pub name:            String,
  pub email:           String,
  pub company:         Option<String>,
  pub status:          RegistrationStatus,
  /// Server-assigned; the admin list shows newest first.
  pub registered_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ContentStore::register_workshop`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
  pub workshop: String,
  pub name:     String,
  pub email:    String,
  #[serde(default)]
  pub company:  Option<String>,
}
