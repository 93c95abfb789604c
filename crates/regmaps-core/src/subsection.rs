//! Subsection — the leaf paragraph of regulatory text, plus the records it
//! owns: footnotes, FAQs, and historical revisions.
//!
//! A subsection is identified within its section by a human-facing `number`
//! (e.g. `"10.3"`). No two subsections under the same section may share a
//! number; the store enforces this at the schema level and surfaces a
//! violation as [`crate::Error::DuplicateSubsectionNumber`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Subsection ──────────────────────────────────────────────────────────────

/// One numbered paragraph of a section's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsection {
  pub subsection_id: Uuid,
  pub section_id:    Uuid,
  /// Human-facing paragraph number, unique within the owning section.
  pub number:        String,
  /// Rich-text body (stored as-is; rendering is the client's concern).
  pub content:       String,
  /// Freeform advisory commentary shown alongside the regulatory text.
  pub advisory_note: Option<String>,
  pub position:      i64,
}

/// Input to [`crate::store::ContentStore::create_subsection`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubsection {
  pub section_id:    Uuid,
  pub number:        String,
  pub content:       String,
  #[serde(default)]
  pub advisory_note: Option<String>,
  #[serde(default)]
  pub position:      i64,
}

/// Partial update: `None` leaves the field unchanged. Changing `number` is
/// subject to the same uniqueness rule as creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubsectionPatch {
  pub number:        Option<String>,
  pub content:       Option<String>,
  pub advisory_note: Option<String>,
  pub position:      Option<i64>,
}

// ─── Footnote ────────────────────────────────────────────────────────────────

/// A numbered footnote on a subsection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footnote {
  pub footnote_id:   Uuid,
  pub subsection_id: Uuid,
  /// Sequence number within the subsection; display order follows it.
  pub number:        i64,
  pub content:       String,
}

/// Input to [`crate::store::ContentStore::create_footnote`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewFootnote {
  pub subsection_id: Uuid,
  pub number:        i64,
  pub content:       String,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FootnotePatch {
  pub number:  Option<i64>,
  pub content: Option<String>,
}

// ─── FAQ ─────────────────────────────────────────────────────────────────────

/// A question/answer pair attached to a subsection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
  pub faq_id:        Uuid,
  pub subsection_id: Uuid,
  pub question:      String,
  pub answer:        String,
  pub position:      i64,
}

/// Input to [`crate::store::ContentStore::create_faq`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewFaq {
  pub subsection_id: Uuid,
  pub question:      String,
  pub answer:        String,
  #[serde(default)]
  pub position:      i64,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqPatch {
  pub question: Option<String>,
  pub answer:   Option<String>,
  pub position: Option<i64>,
}

// ─── Revision ────────────────────────────────────────────────────────────────

/// A historical snapshot of a subsection's text, kept when a regulatory
/// amendment supersedes it. Revisions are append-only by convention: nothing
/// in the service mutates them implicitly, though the admin console can
/// correct one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
  pub revision_id:   Uuid,
  pub subsection_id: Uuid,
  pub title:         String,
  pub content:       String,
  /// The date the superseded text was in force until.
  pub revision_date: NaiveDate,
  pub position:      i64,
}

/// Input to [`crate::store::ContentStore::create_revision`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRevision {
  pub subsection_id: Uuid,
  pub title:         String,
  pub content:       String,
  pub revision_date: NaiveDate,
  #[serde(default)]
  pub position:      i64,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionPatch {
  pub title:         Option<String>,
  pub content:       Option<String>,
  pub revision_date: Option<NaiveDate>,
  pub position:      Option<i64>,
}
