//! Standard — a top-level regulatory framework.
//!
//! A standard owns an ordered list of chapters; it carries only its own
//! identity and display metadata. The nested content lives further down the
//! containment chain (chapter → section → subsection).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named regulatory framework, e.g. a Basel-family standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standard {
  pub standard_id: Uuid,
  /// Short framework code, e.g. `"KPB"`. Used to build deep-link URLs.
  pub code:        String,
  pub name:        String,
  pub description: Option<String>,
  /// Advisory sort key; ascending, ties broken by the store's default order.
  pub position:    i64,
}

/// Input to [`crate::store::ContentStore::create_standard`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewStandard {
  pub code:        String,
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub position:    i64,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandardPatch {
  pub code:        Option<String>,
  pub name:        Option<String>,
  pub description: Option<String>,
  pub position:    Option<i64>,
}
