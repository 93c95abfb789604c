//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use regmaps_core::{
  Error as DomainError,
  chapter::{ChapterPatch, NewChapter, NewChapterPdf},
  notification::NewNotification,
  section::NewSection,
  standard::{NewStandard, StandardPatch},
  store::ContentStore,
  subsection::{NewFaq, NewFootnote, NewRevision, NewSubsection, SubsectionPatch},
  workshop::{NewRegistration, RegistrationStatus},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_standard(code: &str, name: &str, position: i64) -> NewStandard {
  NewStandard {
    code:        code.into(),
    name:        name.into(),
    description: None,
    position,
  }
}

fn new_chapter(standard_id: Uuid, code: &str, title: &str, position: i64) -> NewChapter {
  NewChapter {
    standard_id,
    code: code.into(),
    title: title.into(),
    status: Default::default(),
    effective_date: None,
    position,
  }
}

fn new_section(chapter_id: Uuid, title: &str, position: i64) -> NewSection {
  NewSection { chapter_id, title: title.into(), position }
}

fn new_subsection(section_id: Uuid, number: &str, content: &str) -> NewSubsection {
  NewSubsection {
    section_id,
    number: number.into(),
    content: content.into(),
    advisory_note: None,
    position: 0,
  }
}

// ─── Standards ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_standard() {
  let s = store().await;

  let standard = s.create_standard(new_standard("KPB", "Capital", 0)).await.unwrap();
  assert_eq!(standard.code, "KPB");

  let fetched = s.get_standard(standard.standard_id).await.unwrap();
  assert!(fetched.is_some());
  assert_eq!(fetched.unwrap().name, "Capital");
}

#[tokio::test]
async fn get_standard_missing_returns_none() {
  let s = store().await;
  assert!(s.get_standard(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_standards_ordered_by_position() {
  let s = store().await;
  s.create_standard(new_standard("CCC", "Third", 2)).await.unwrap();
  s.create_standard(new_standard("AAA", "First", 0)).await.unwrap();
  s.create_standard(new_standard("BBB", "Second", 1)).await.unwrap();

  let all = s.list_standards().await.unwrap();
  let codes: Vec<&str> = all.iter().map(|st| st.code.as_str()).collect();
  assert_eq!(codes, ["AAA", "BBB", "CCC"]);
}

#[tokio::test]
async fn update_standard_is_partial() {
  let s = store().await;
  let standard = s.create_standard(new_standard("KPB", "Capital", 0)).await.unwrap();

  let updated = s
    .update_standard(standard.standard_id, StandardPatch {
      name: Some("Capital Requirements".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  // Unsupplied fields are untouched.
  assert_eq!(updated.code, "KPB");
  assert_eq!(updated.name, "Capital Requirements");
  assert_eq!(updated.position, 0);
}

#[tokio::test]
async fn update_missing_standard_is_not_found() {
  let s = store().await;
  let err = s
    .update_standard(Uuid::new_v4(), StandardPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(DomainError::StandardNotFound(_))));
}

// ─── Chapters ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chapter_update_always_stamps_last_update() {
  let s = store().await;
  let standard = s.create_standard(new_standard("KPB", "Capital", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "10", "Scope", 0))
    .await
    .unwrap();

  tokio::time::sleep(Duration::from_millis(10)).await;

  // An empty patch still advances the freshness stamp.
  let updated = s
    .update_chapter(chapter.chapter_id, ChapterPatch::default())
    .await
    .unwrap();
  assert!(updated.last_update > chapter.last_update);
  assert_eq!(updated.title, "Scope");
}

#[tokio::test]
async fn list_chapters_filtered_and_ordered() {
  let s = store().await;
  let a = s.create_standard(new_standard("AAA", "A", 0)).await.unwrap();
  let b = s.create_standard(new_standard("BBB", "B", 1)).await.unwrap();

  s.create_chapter(new_chapter(a.standard_id, "20", "Second", 1)).await.unwrap();
  s.create_chapter(new_chapter(a.standard_id, "10", "First", 0)).await.unwrap();
  s.create_chapter(new_chapter(b.standard_id, "99", "Other", 0)).await.unwrap();

  let chapters = s.list_chapters(a.standard_id).await.unwrap();
  let codes: Vec<&str> = chapters.iter().map(|c| c.code.as_str()).collect();
  assert_eq!(codes, ["10", "20"]);
}

#[tokio::test]
async fn create_chapter_with_missing_standard_is_a_storage_error() {
  let s = store().await;
  // The foreign key rejects the orphan; no dedicated parent check exists.
  let err = s
    .create_chapter(new_chapter(Uuid::new_v4(), "10", "Orphan", 0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

// ─── Subsection uniqueness ───────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_subsection_number_is_rejected() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec1", 0))
    .await
    .unwrap();

  s.create_subsection(new_subsection(section.section_id, "1", "hello"))
    .await
    .unwrap();

  let err = s
    .create_subsection(new_subsection(section.section_id, "1", "again"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(DomainError::DuplicateSubsectionNumber { .. })
  ));
  assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn same_number_in_different_sections_is_allowed() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let one = s.create_section(new_section(chapter.chapter_id, "One", 0)).await.unwrap();
  let two = s.create_section(new_section(chapter.chapter_id, "Two", 1)).await.unwrap();

  s.create_subsection(new_subsection(one.section_id, "1", "a")).await.unwrap();
  s.create_subsection(new_subsection(two.section_id, "1", "b")).await.unwrap();
}

#[tokio::test]
async fn renumbering_onto_a_taken_number_is_rejected() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec1", 0))
    .await
    .unwrap();

  s.create_subsection(new_subsection(section.section_id, "1", "a")).await.unwrap();
  let second = s
    .create_subsection(new_subsection(section.section_id, "2", "b"))
    .await
    .unwrap();

  let err = s
    .update_subsection(second.subsection_id, SubsectionPatch {
      number: Some("1".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(DomainError::DuplicateSubsectionNumber { .. })
  ));
}

#[tokio::test]
async fn subsection_update_is_idempotent() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec1", 0))
    .await
    .unwrap();
  let subsection = s
    .create_subsection(new_subsection(section.section_id, "1", "old"))
    .await
    .unwrap();

  let patch = SubsectionPatch {
    content: Some("new".into()),
    ..Default::default()
  };
  let first = s.update_subsection(subsection.subsection_id, patch.clone()).await.unwrap();
  let second = s.update_subsection(subsection.subsection_id, patch).await.unwrap();

  assert_eq!(first.content, "new");
  assert_eq!(second.content, first.content);
  assert_eq!(second.number, first.number);
}

// ─── Cascade delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_standard_cascades_to_the_leaves() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec1", 0))
    .await
    .unwrap();
  let subsection = s
    .create_subsection(new_subsection(section.section_id, "1", "hello"))
    .await
    .unwrap();

  assert!(s.delete_standard(standard.standard_id).await.unwrap());

  assert!(s.get_chapter(chapter.chapter_id).await.unwrap().is_none());
  assert!(s.get_section(section.section_id).await.unwrap().is_none());
  assert!(s.get_subsection(subsection.subsection_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete_standard(Uuid::new_v4()).await.unwrap());
}

// ─── Nested reads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn chapter_detail_nests_ordered_children() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();

  s.create_section(new_section(chapter.chapter_id, "Late", 1)).await.unwrap();
  let early = s.create_section(new_section(chapter.chapter_id, "Early", 0)).await.unwrap();

  let mut sub_b = new_subsection(early.section_id, "2", "b");
  sub_b.position = 1;
  s.create_subsection(sub_b).await.unwrap();
  let mut sub_a = new_subsection(early.section_id, "1", "a");
  sub_a.position = 0;
  s.create_subsection(sub_a).await.unwrap();

  let detail = s.chapter_detail(chapter.chapter_id).await.unwrap().unwrap();
  assert_eq!(detail.chapter.chapter_id, chapter.chapter_id);
  assert_eq!(detail.sections.len(), 2);
  assert_eq!(detail.sections[0].section.title, "Early");
  assert_eq!(detail.sections[1].section.title, "Late");

  let numbers: Vec<&str> = detail.sections[0]
    .subsections
    .iter()
    .map(|sub| sub.number.as_str())
    .collect();
  assert_eq!(numbers, ["1", "2"]);
  assert!(detail.sections[1].subsections.is_empty());
}

#[tokio::test]
async fn subsection_detail_orders_owned_records() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec1", 0))
    .await
    .unwrap();
  let subsection = s
    .create_subsection(new_subsection(section.section_id, "1", "hello"))
    .await
    .unwrap();

  s.create_footnote(NewFootnote {
    subsection_id: subsection.subsection_id,
    number:        2,
    content:       "second".into(),
  })
  .await
  .unwrap();
  s.create_footnote(NewFootnote {
    subsection_id: subsection.subsection_id,
    number:        1,
    content:       "first".into(),
  })
  .await
  .unwrap();

  s.create_faq(NewFaq {
    subsection_id: subsection.subsection_id,
    question:      "Q".into(),
    answer:        "A".into(),
    position:      0,
  })
  .await
  .unwrap();

  s.create_revision(NewRevision {
    subsection_id: subsection.subsection_id,
    title:         "2019 text".into(),
    content:       "previous wording".into(),
    revision_date: chrono::NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
    position:      0,
  })
  .await
  .unwrap();

  let detail = s
    .subsection_detail(subsection.subsection_id)
    .await
    .unwrap()
    .unwrap();
  let numbers: Vec<i64> = detail.footnotes.iter().map(|f| f.number).collect();
  assert_eq!(numbers, [1, 2]);
  assert_eq!(detail.faqs.len(), 1);
  assert_eq!(detail.revisions.len(), 1);
  assert_eq!(detail.revisions[0].title, "2019 text");
}

#[tokio::test]
async fn reference_tree_nests_every_level_in_order() {
  let s = store().await;
  let second = s.create_standard(new_standard("BBB", "Second", 1)).await.unwrap();
  let first = s.create_standard(new_standard("AAA", "First", 0)).await.unwrap();

  let chapter = s
    .create_chapter(new_chapter(first.standard_id, "10", "Scope", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec", 0))
    .await
    .unwrap();
  s.create_subsection(new_subsection(section.section_id, "10.1", "text"))
    .await
    .unwrap();

  let tree = s.reference_tree().await.unwrap();
  assert_eq!(tree.len(), 2);
  assert_eq!(tree[0].code, "AAA");
  assert_eq!(tree[1].code, "BBB");
  assert_eq!(tree[0].chapters.len(), 1);
  assert_eq!(tree[0].chapters[0].sections[0].subsections[0].number, "10.1");
  // A standard with no chapters still appears, empty.
  assert!(tree[1].chapters.is_empty());
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn seed_search_corpus(s: &SqliteStore) -> Uuid {
  let standard = s
    .create_standard(NewStandard {
      code:        "XYZ".into(),
      name:        "Test Framework".into(),
      description: Some("capital adequacy".into()),
      position:    0,
    })
    .await
    .unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Capital rules", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Capital buffers", 0))
    .await
    .unwrap();
  s.create_subsection(new_subsection(section.section_id, "1", "capital floors apply"))
    .await
    .unwrap();
  standard.standard_id
}

#[tokio::test]
async fn search_rejects_short_queries() {
  let s = store().await;
  let err = s.search("x").await.unwrap_err();
  assert!(matches!(err, Error::Core(DomainError::QueryTooShort { .. })));

  // Whitespace does not count toward the minimum.
  let err = s.search("  x  ").await.unwrap_err();
  assert!(matches!(err, Error::Core(DomainError::QueryTooShort { .. })));
}

#[tokio::test]
async fn search_with_no_match_is_empty() {
  let s = store().await;
  seed_search_corpus(&s).await;

  let results = s.search("zzzzzz").await.unwrap();
  assert_eq!(results.total, 0);
  assert!(results.standards.is_empty());
  assert!(results.subsections.is_empty());
}

#[tokio::test]
async fn search_populates_multiple_buckets() {
  let s = store().await;
  seed_search_corpus(&s).await;

  // Case-insensitive; "capital" appears in every entity type.
  let results = s.search("CAPITAL").await.unwrap();
  assert_eq!(results.standards.len(), 1);
  assert_eq!(results.chapters.len(), 1);
  assert_eq!(results.sections.len(), 1);
  assert_eq!(results.subsections.len(), 1);
  assert_eq!(
    results.total,
    results.standards.len()
      + results.chapters.len()
      + results.sections.len()
      + results.subsections.len()
  );
}

#[tokio::test]
async fn search_synthesizes_deep_links() {
  let s = store().await;
  let standard_id = seed_search_corpus(&s).await;

  let results = s.search("XYZ").await.unwrap();
  let hit = &results.standards[0];
  assert_eq!(hit.id, standard_id);
  assert!(hit.url.ends_with("/regmaps/xyz"), "url: {}", hit.url);

  let results = s.search("capital floors").await.unwrap();
  let hit = &results.subsections[0];
  assert_eq!(hit.code, "XYZ01.1");
  assert!(hit.url.starts_with("/regmaps/xyz/01#"), "url: {}", hit.url);
}

#[tokio::test]
async fn search_caps_each_bucket_independently() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();
  let section = s
    .create_section(new_section(chapter.chapter_id, "Sec", 0))
    .await
    .unwrap();

  for i in 0..25 {
    s.create_subsection(new_subsection(
      section.section_id,
      &format!("1.{i}"),
      "basel basel basel",
    ))
    .await
    .unwrap();
  }

  let results = s.search("basel").await.unwrap();
  assert_eq!(results.subsections.len(), regmaps_core::search::SUBSECTION_CAP);
  assert_eq!(results.total, regmaps_core::search::SUBSECTION_CAP);
}

// ─── Chapter PDFs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_delete_returns_the_removed_record() {
  let s = store().await;
  let standard = s.create_standard(new_standard("XYZ", "Test", 0)).await.unwrap();
  let chapter = s
    .create_chapter(new_chapter(standard.standard_id, "01", "Intro", 0))
    .await
    .unwrap();

  let pdf = s
    .add_chapter_pdf(NewChapterPdf {
      chapter_id:  chapter.chapter_id,
      name:        "Consultation paper".into(),
      url:         "https://cdn.example.com/xyz-01.pdf".into(),
      stored_name: "xyz-01.pdf".into(),
    })
    .await
    .unwrap();

  let removed = s.delete_chapter_pdf(pdf.pdf_id).await.unwrap();
  assert_eq!(removed.map(|p| p.stored_name), Some("xyz-01.pdf".into()));

  // Second delete finds nothing.
  assert!(s.delete_chapter_pdf(pdf.pdf_id).await.unwrap().is_none());
  assert!(s.list_chapter_pdfs(chapter.chapter_id).await.unwrap().is_empty());
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notification_inbox_flow() {
  let s = store().await;

  let first = s
    .publish_notification(NewNotification {
      title: "Old".into(),
      body:  "first".into(),
    })
    .await
    .unwrap();
  tokio::time::sleep(Duration::from_millis(10)).await;
  s.publish_notification(NewNotification {
    title: "New".into(),
    body:  "second".into(),
  })
  .await
  .unwrap();

  // Newest first.
  let inbox = s.list_notifications().await.unwrap();
  assert_eq!(inbox[0].title, "New");
  assert_eq!(s.unread_notifications().await.unwrap(), 2);

  let read = s.mark_notification_read(first.notification_id).await.unwrap();
  assert!(read.read);
  assert_eq!(s.unread_notifications().await.unwrap(), 1);

  assert!(s.delete_notification(first.notification_id).await.unwrap());
  assert_eq!(s.list_notifications().await.unwrap().len(), 1);
}

#[tokio::test]
async fn mark_read_on_missing_notification_is_not_found() {
  let s = store().await;
  let err = s.mark_notification_read(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(DomainError::NotificationNotFound(_))
  ));
}

// ─── Workshop registrations ──────────────────────────────────────────────────

#[tokio::test]
async fn workshop_registration_flow() {
  let s = store().await;

  let registration = s
    .register_workshop(NewRegistration {
      workshop: "icaap-fundamentals".into(),
      name:     "Alice".into(),
      email:    "alice@example.com".into(),
      company:  Some("Acme Bank".into()),
    })
    .await
    .unwrap();
  assert_eq!(registration.status, RegistrationStatus::Pending);

  let confirmed = s
    .set_registration_status(
      registration.registration_id,
      RegistrationStatus::Confirmed,
    )
    .await
    .unwrap();
  assert_eq!(confirmed.status, RegistrationStatus::Confirmed);

  assert!(s.delete_registration(registration.registration_id).await.unwrap());
  assert!(s.list_registrations().await.unwrap().is_empty());
}
