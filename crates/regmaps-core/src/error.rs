//! Error types for `regmaps-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("standard not found: {0}")]
  StandardNotFound(Uuid),

  #[error("chapter not found: {0}")]
  ChapterNotFound(Uuid),

  #[error("chapter PDF not found: {0}")]
  PdfNotFound(Uuid),

  #[error("section not found: {0}")]
  SectionNotFound(Uuid),

  #[error("subsection not found: {0}")]
  SubsectionNotFound(Uuid),

  #[error("footnote not found: {0}")]
  FootnoteNotFound(Uuid),

  #[error("FAQ not found: {0}")]
  FaqNotFound(Uuid),

  #[error("revision not found: {0}")]
  RevisionNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  #[error("workshop registration not found: {0}")]
  RegistrationNotFound(Uuid),

  #[error("subsection number {number:?} already exists in section {section_id}")]
  DuplicateSubsectionNumber { section_id: Uuid, number: String },

  #[error("search query must be at least {min} characters")]
  QueryTooShort { min: usize },

  /// Unclassified backend failure (connection, SQL, corrupt row, ...).
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
