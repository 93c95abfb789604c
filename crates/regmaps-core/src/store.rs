//! The `ContentStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `regmaps-store-sqlite`).
//! Higher layers (`regmaps-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  chapter::{Chapter, ChapterPatch, ChapterPdf, NewChapter, NewChapterPdf},
  notification::{NewNotification, Notification},
  search::SearchResults,
  section::{NewSection, Section, SectionPatch},
  standard::{NewStandard, Standard, StandardPatch},
  subsection::{
    Faq, FaqPatch, Footnote, FootnotePatch, NewFaq, NewFootnote, NewRevision,
    NewSubsection, Revision, RevisionPatch, Subsection, SubsectionPatch,
  },
  tree::{ChapterDetail, StandardNode, SubsectionDetail},
  workshop::{NewRegistration, RegistrationStatus, WorkshopRegistration},
};

/// Abstraction over a regmaps content store backend.
///
/// Conventions shared by every operation:
/// - `get_*` returns `Ok(None)` for a missing id; `update_*` and `delete_*`
///   on a missing id surface the entity's not-found error (update) or
///   `Ok(false)` (delete).
/// - every `list_*` is filtered by the owning parent and ordered by the
///   entity's `position` key, ascending.
/// - `delete_*` is a hard delete; the schema cascades it down the
///   containment chain.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Standards ─────────────────────────────────────────────────────────

  fn create_standard(
    &self,
    input: NewStandard,
  ) -> impl Future<Output = Result<Standard, Self::Error>> + Send + '_;

  fn get_standard(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Standard>, Self::Error>> + Send + '_;

  /// All standards, ordered by `position`.
  fn list_standards(
    &self,
  ) -> impl Future<Output = Result<Vec<Standard>, Self::Error>> + Send + '_;

  fn update_standard(
    &self,
    id: Uuid,
    patch: StandardPatch,
  ) -> impl Future<Output = Result<Standard, Self::Error>> + Send + '_;

  fn delete_standard(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Chapters ──────────────────────────────────────────────────────────

  fn create_chapter(
    &self,
    input: NewChapter,
  ) -> impl Future<Output = Result<Chapter, Self::Error>> + Send + '_;

  fn get_chapter(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Chapter>, Self::Error>> + Send + '_;

  /// The chapter plus its ordered sections (each with ordered subsections)
  /// and its PDF attachments — the read behind the chapter page.
  fn chapter_detail(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ChapterDetail>, Self::Error>> + Send + '_;

  fn list_chapters(
    &self,
    standard_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Chapter>, Self::Error>> + Send + '_;

  /// Always stamps `last_update`, even when `patch` is empty.
  fn update_chapter(
    &self,
    id: Uuid,
    patch: ChapterPatch,
  ) -> impl Future<Output = Result<Chapter, Self::Error>> + Send + '_;

  fn delete_chapter(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Chapter PDFs ──────────────────────────────────────────────────────

  fn add_chapter_pdf(
    &self,
    input: NewChapterPdf,
  ) -> impl Future<Output = Result<ChapterPdf, Self::Error>> + Send + '_;

  fn list_chapter_pdfs(
    &self,
    chapter_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ChapterPdf>, Self::Error>> + Send + '_;

  /// Removes the metadata record and returns it, so the caller can delete
  /// the backing file afterwards (the second, best-effort phase).
  fn delete_chapter_pdf(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ChapterPdf>, Self::Error>> + Send + '_;

  // ── Sections ──────────────────────────────────────────────────────────

  fn create_section(
    &self,
    input: NewSection,
  ) -> impl Future<Output = Result<Section, Self::Error>> + Send + '_;

  fn get_section(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + '_;

  fn list_sections(
    &self,
    chapter_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Section>, Self::Error>> + Send + '_;

  fn update_section(
    &self,
    id: Uuid,
    patch: SectionPatch,
  ) -> impl Future<Output = Result<Section, Self::Error>> + Send + '_;

  fn delete_section(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subsections ───────────────────────────────────────────────────────

  /// Rejects a duplicate `(section_id, number)` with
  /// [`crate::Error::DuplicateSubsectionNumber`]. The uniqueness check is
  /// atomic with the insert (schema constraint, not check-then-insert).
  fn create_subsection(
    &self,
    input: NewSubsection,
  ) -> impl Future<Output = Result<Subsection, Self::Error>> + Send + '_;

  fn get_subsection(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subsection>, Self::Error>> + Send + '_;

  /// The subsection plus its ordered footnotes, FAQs, and revisions.
  fn subsection_detail(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SubsectionDetail>, Self::Error>> + Send + '_;

  fn list_subsections(
    &self,
    section_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Subsection>, Self::Error>> + Send + '_;

  /// Renumbering is subject to the same uniqueness rule as creation.
  fn update_subsection(
    &self,
    id: Uuid,
    patch: SubsectionPatch,
  ) -> impl Future<Output = Result<Subsection, Self::Error>> + Send + '_;

  fn delete_subsection(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Footnotes ─────────────────────────────────────────────────────────

  fn create_footnote(
    &self,
    input: NewFootnote,
  ) -> impl Future<Output = Result<Footnote, Self::Error>> + Send + '_;

  /// Ordered by footnote `number`, ascending.
  fn list_footnotes(
    &self,
    subsection_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Footnote>, Self::Error>> + Send + '_;

  fn update_footnote(
    &self,
    id: Uuid,
    patch: FootnotePatch,
  ) -> impl Future<Output = Result<Footnote, Self::Error>> + Send + '_;

  fn delete_footnote(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── FAQs ──────────────────────────────────────────────────────────────

  fn create_faq(
    &self,
    input: NewFaq,
  ) -> impl Future<Output = Result<Faq, Self::Error>> + Send + '_;

  fn list_faqs(
    &self,
    subsection_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Faq>, Self::Error>> + Send + '_;

  fn update_faq(
    &self,
    id: Uuid,
    patch: FaqPatch,
  ) -> impl Future<Output = Result<Faq, Self::Error>> + Send + '_;

  fn delete_faq(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Revisions ─────────────────────────────────────────────────────────

  fn create_revision(
    &self,
    input: NewRevision,
  ) -> impl Future<Output = Result<Revision, Self::Error>> + Send + '_;

  fn list_revisions(
    &self,
    subsection_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Revision>, Self::Error>> + Send + '_;

  fn update_revision(
    &self,
    id: Uuid,
    patch: RevisionPatch,
  ) -> impl Future<Output = Result<Revision, Self::Error>> + Send + '_;

  fn delete_revision(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Aggregate reads ───────────────────────────────────────────────────

  /// Every standard with nested chapters → sections → subsections (identity
  /// and labels only), each level ordered by `position`. One nested query;
  /// the result feeds the reference-picker cache.
  fn reference_tree(
    &self,
  ) -> impl Future<Output = Result<Vec<StandardNode>, Self::Error>> + Send + '_;

  /// Free-text search; see [`crate::search`] for the contract. Rejects a
  /// trimmed query shorter than [`crate::search::MIN_QUERY_LEN`] with
  /// [`crate::Error::QueryTooShort`].
  fn search<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<SearchResults, Self::Error>> + Send + 'a;

  // ── Notifications ─────────────────────────────────────────────────────

  fn publish_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_notifications(
    &self,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  fn unread_notifications(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn mark_notification_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  fn delete_notification(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Workshop registrations ────────────────────────────────────────────

  fn register_workshop(
    &self,
    input: NewRegistration,
  ) -> impl Future<Output = Result<WorkshopRegistration, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_registrations(
    &self,
  ) -> impl Future<Output = Result<Vec<WorkshopRegistration>, Self::Error>> + Send + '_;

  fn set_registration_status(
    &self,
    id: Uuid,
    status: RegistrationStatus,
  ) -> impl Future<Output = Result<WorkshopRegistration, Self::Error>> + Send + '_;

  fn delete_registration(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
