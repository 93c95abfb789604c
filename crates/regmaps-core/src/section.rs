//! Section — the middle level of a chapter's text.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A titled grouping of subsections within a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
  pub section_id: Uuid,
  pub chapter_id: Uuid,
  pub title:      String,
  pub position:   i64,
}

/// Input to [`crate::store::ContentStore::create_section`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSection {
  pub chapter_id: Uuid,
  pub title:      String,
  #[serde(default)]
  pub position:   i64,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionPatch {
  pub title:    Option<String>,
  pub position: Option<i64>,
}
