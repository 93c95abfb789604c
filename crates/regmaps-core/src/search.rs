//! Search result types and deep-link synthesis.
//!
//! Search runs four independent case-insensitive substring queries — one per
//! entity type, each with its own result cap — and assembles the hits into
//! typed buckets. `code` and `url` on each hit are synthesized by walking
//! the record's parent chain, so a hit can be rendered and navigated without
//! further lookups.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queries shorter than this (after trimming) are rejected.
pub const MIN_QUERY_LEN: usize = 2;

/// Per-bucket result caps. Four bounded queries instead of one ranked one:
/// adequate for a small curated corpus, no relevance ranking or pagination.
pub const STANDARD_CAP: usize = 5;
pub const CHAPTER_CAP: usize = 10;
pub const SECTION_CAP: usize = 10;
pub const SUBSECTION_CAP: usize = 20;

/// Which entity type a hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
  Standard,
  Chapter,
  Section,
  Subsection,
}

/// One search result with its synthesized navigation target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
  pub kind:  HitKind,
  pub id:    Uuid,
  /// Human-facing citation code, e.g. `"KPB10.3"` for a subsection.
  pub code:  String,
  pub title: String,
  pub url:   String,
}

impl SearchHit {
  pub fn standard(id: Uuid, code: &str, name: &str) -> Self {
    Self {
      kind:  HitKind::Standard,
      id,
      code:  code.to_owned(),
      title: name.to_owned(),
      url:   format!("/regmaps/{}", code.to_lowercase()),
    }
  }

  pub fn chapter(id: Uuid, standard_code: &str, code: &str, title: &str) -> Self {
    Self {
      kind:  HitKind::Chapter,
      id,
      code:  format!("{standard_code}{code}"),
      title: title.to_owned(),
      url:   chapter_url(standard_code, code),
    }
  }

  /// Section hits link to the owning chapter page, anchored at the section.
  pub fn section(
    id: Uuid,
    standard_code: &str,
    chapter_code: &str,
    title: &str,
  ) -> Self {
    Self {
      kind:  HitKind::Section,
      id,
      code:  format!("{standard_code}{chapter_code}"),
      title: title.to_owned(),
      url:   format!("{}#sec-{id}", chapter_url(standard_code, chapter_code)),
    }
  }

  /// Subsection hits cite `{standard}{chapter}.{number}` and link to the
  /// owning chapter page anchored at the subsection id. The owning chapter's
  /// title labels the hit; the precise pointer is the code.
  pub fn subsection(
    id: Uuid,
    standard_code: &str,
    chapter_code: &str,
    number: &str,
    chapter_title: &str,
  ) -> Self {
    Self {
      kind:  HitKind::Subsection,
      id,
      code:  format!("{standard_code}{chapter_code}.{number}"),
      title: chapter_title.to_owned(),
      url:   format!("{}#{id}", chapter_url(standard_code, chapter_code)),
    }
  }
}

fn chapter_url(standard_code: &str, chapter_code: &str) -> String {
  format!("/regmaps/{}/{chapter_code}", standard_code.to_lowercase())
}

/// The assembled response: four typed buckets plus the total across them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
  pub total:       usize,
  pub standards:   Vec<SearchHit>,
  pub chapters:    Vec<SearchHit>,
  pub sections:    Vec<SearchHit>,
  pub subsections: Vec<SearchHit>,
}

impl SearchResults {
  pub fn assemble(
    standards: Vec<SearchHit>,
    chapters: Vec<SearchHit>,
    sections: Vec<SearchHit>,
    subsections: Vec<SearchHit>,
  ) -> Self {
    Self {
      total: standards.len() + chapters.len() + sections.len() + subsections.len(),
      standards,
      chapters,
      sections,
      subsections,
    }
  }
}
