//! Read models assembled from the containment hierarchy.
//!
//! The node types carry identity and labels only (no content bodies) — they
//! back the reference-picker tree, which is cached whole. The detail types
//! are the full nested reads behind the chapter and subsection pages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  chapter::{Chapter, ChapterPdf, ChapterStatus},
  section::Section,
  subsection::{Faq, Footnote, Revision, Subsection},
};

// ─── Reference tree ──────────────────────────────────────────────────────────

/// Leaf of the reference tree: a subsection's identity and number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionNode {
  pub subsection_id: Uuid,
  pub number:        String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
  pub section_id:  Uuid,
  pub title:       String,
  pub subsections: Vec<SubsectionNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterNode {
  pub chapter_id: Uuid,
  pub code:       String,
  pub title:      String,
  pub status:     ChapterStatus,
  pub sections:   Vec<SectionNode>,
}

/// Root of the reference tree: one standard with everything nested below it.
/// Every level is ordered by its `position` key, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardNode {
  pub standard_id: Uuid,
  pub code:        String,
  pub name:        String,
  pub chapters:    Vec<ChapterNode>,
}

// ─── Detail reads ────────────────────────────────────────────────────────────

/// A section with its ordered subsections, as nested inside
/// [`ChapterDetail`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDetail {
  pub section:     Section,
  pub subsections: Vec<Subsection>,
}

/// A chapter with its ordered sections (each with ordered subsections) and
/// its PDF attachments — the full read behind the chapter page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDetail {
  pub chapter:  Chapter,
  pub pdfs:     Vec<ChapterPdf>,
  pub sections: Vec<SectionDetail>,
}

/// A subsection with everything it owns, each list ordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionDetail {
  pub subsection: Subsection,
  pub footnotes:  Vec<Footnote>,
  pub faqs:       Vec<Faq>,
  pub revisions:  Vec<Revision>,
}
