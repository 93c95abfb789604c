//! Chapter — one chapter of a standard, plus its PDF attachments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Lifecycle status ────────────────────────────────────────────────────────

/// Whether a chapter is the current text or an archived predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
  #[default]
  Current,
  Archived,
}

// ─── Chapter ─────────────────────────────────────────────────────────────────

/// One chapter of a standard's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
  pub chapter_id:     Uuid,
  pub standard_id:    Uuid,
  /// Chapter code within the standard, e.g. `"10"`.
  pub code:           String,
  pub title:          String,
  pub status:         ChapterStatus,
  pub effective_date: Option<NaiveDate>,
  /// Stamped by the store on create and on *every* update, regardless of
  /// which fields changed.
  pub last_update:    DateTime<Utc>,
  pub position:       i64,
}

/// Input to [`crate::store::ContentStore::create_chapter`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewChapter {
  pub standard_id:    Uuid,
  pub code:           String,
  pub title:          String,
  #[serde(default)]
  pub status:         ChapterStatus,
  #[serde(default)]
  pub effective_date: Option<NaiveDate>,
  #[serde(default)]
  pub position:       i64,
}

/// Partial update: `None` leaves the field unchanged. `last_update` is not
/// accepted from callers; the store stamps it on every update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterPatch {
  pub code:           Option<String>,
  pub title:          Option<String>,
  pub status:         Option<ChapterStatus>,
  pub effective_date: Option<NaiveDate>,
  pub position:       Option<i64>,
}

// ─── PDF attachments ─────────────────────────────────────────────────────────

/// Metadata for a PDF attached to a chapter. The bytes live outside the
/// store; `stored_name` is the object name used when deleting the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterPdf {
  pub pdf_id:      Uuid,
  pub chapter_id:  Uuid,
  /// Display label shown next to the download link.
  pub name:        String,
  pub url:         String,
  pub stored_name: String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ContentStore::add_chapter_pdf`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewChapterPdf {
  pub chapter_id:  Uuid,
  pub name:        String,
  pub url:         String,
  pub stored_name: String,
}
