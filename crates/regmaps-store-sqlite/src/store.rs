//! [`SqliteStore`] — the SQLite implementation of [`ContentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use regmaps_core::{
  Error as DomainError,
  chapter::{Chapter, ChapterPatch, ChapterPdf, NewChapter, NewChapterPdf},
  notification::{NewNotification, Notification},
  search::{
    CHAPTER_CAP, MIN_QUERY_LEN, SECTION_CAP, STANDARD_CAP, SUBSECTION_CAP,
    SearchHit, SearchResults,
  },
  section::{NewSection, Section, SectionPatch},
  standard::{NewStandard, Standard, StandardPatch},
  store::ContentStore,
  subsection::{
    Faq, FaqPatch, Footnote, FootnotePatch, NewFaq, NewFootnote, NewRevision,
    NewSubsection, Revision, RevisionPatch, Subsection, SubsectionPatch,
  },
  tree::{
    ChapterDetail, ChapterNode, SectionDetail, SectionNode, StandardNode,
    SubsectionDetail, SubsectionNode,
  },
  workshop::{NewRegistration, RegistrationStatus, WorkshopRegistration},
};

use crate::{
  Error, Result,
  encode::{
    RawChapter, RawChapterPdf, RawFaq, RawFootnote, RawNotification,
    RawRegistration, RawRevision, RawSection, RawStandard, RawSubsection,
    decode_chapter_status, decode_uuid, encode_chapter_status, encode_date,
    encode_dt, encode_registration_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Column lists ────────────────────────────────────────────────────────────

// Shared between query_row and query_map call sites so the row mappers below
// always see the same column order.
const STANDARD_COLS: &str = "standard_id, code, name, description, position";
const CHAPTER_COLS: &str =
  "chapter_id, standard_id, code, title, status, effective_date, last_update, position";
const PDF_COLS: &str = "pdf_id, chapter_id, name, url, stored_name, created_at";
const SECTION_COLS: &str = "section_id, chapter_id, title, position";
const SUBSECTION_COLS: &str =
  "subsection_id, section_id, number, content, advisory_note, position";
const FOOTNOTE_COLS: &str = "footnote_id, subsection_id, number, content";
const FAQ_COLS: &str = "faq_id, subsection_id, question, answer, position";
const REVISION_COLS: &str =
  "revision_id, subsection_id, title, content, revision_date, position";
const NOTIFICATION_COLS: &str =
  "notification_id, title, body, created_at, read";
const REGISTRATION_COLS: &str =
  "registration_id, workshop, name, email, company, status, registered_at";

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn map_standard(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStandard> {
  Ok(RawStandard {
    standard_id: row.get(0)?,
    code:        row.get(1)?,
    name:        row.get(2)?,
    description: row.get(3)?,
    position:    row.get(4)?,
  })
}

fn map_chapter(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawChapter> {
  Ok(RawChapter {
    chapter_id:     row.get(0)?,
    standard_id:    row.get(1)?,
    code:           row.get(2)?,
    title:          row.get(3)?,
    status:         row.get(4)?,
    effective_date: row.get(5)?,
    last_update:    row.get(6)?,
    position:       row.get(7)?,
  })
}

fn map_pdf(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawChapterPdf> {
  Ok(RawChapterPdf {
    pdf_id:      row.get(0)?,
    chapter_id:  row.get(1)?,
    name:        row.get(2)?,
    url:         row.get(3)?,
    stored_name: row.get(4)?,
    created_at:  row.get(5)?,
  })
}

fn map_section(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSection> {
  Ok(RawSection {
    section_id: row.get(0)?,
    chapter_id: row.get(1)?,
    title:      row.get(2)?,
    position:   row.get(3)?,
  })
}

fn map_subsection(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubsection> {
  Ok(RawSubsection {
    subsection_id: row.get(0)?,
    section_id:    row.get(1)?,
    number:        row.get(2)?,
    content:       row.get(3)?,
    advisory_note: row.get(4)?,
    position:      row.get(5)?,
  })
}

fn map_footnote(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFootnote> {
  Ok(RawFootnote {
    footnote_id:   row.get(0)?,
    subsection_id: row.get(1)?,
    number:        row.get(2)?,
    content:       row.get(3)?,
  })
}

fn map_faq(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFaq> {
  Ok(RawFaq {
    faq_id:        row.get(0)?,
    subsection_id: row.get(1)?,
    question:      row.get(2)?,
    answer:        row.get(3)?,
    position:      row.get(4)?,
  })
}

fn map_revision(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRevision> {
  Ok(RawRevision {
    revision_id:   row.get(0)?,
    subsection_id: row.get(1)?,
    title:         row.get(2)?,
    content:       row.get(3)?,
    revision_date: row.get(4)?,
    position:      row.get(5)?,
  })
}

fn map_notification(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    notification_id: row.get(0)?,
    title:           row.get(1)?,
    body:            row.get(2)?,
    created_at:      row.get(3)?,
    read:            row.get(4)?,
  })
}

fn map_registration(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawRegistration> {
  Ok(RawRegistration {
    registration_id: row.get(0)?,
    workshop:        row.get(1)?,
    name:            row.get(2)?,
    email:           row.get(3)?,
    company:         row.get(4)?,
    status:          row.get(5)?,
    registered_at:   row.get(6)?,
  })
}

// ─── Dynamic UPDATE helpers ──────────────────────────────────────────────────

/// Append `column = ?n` to a dynamic SET clause when the patch supplied a
/// value. Parameter numbering follows the insertion order in `values`.
fn push_set<T: rusqlite::ToSql + 'static>(
  sets: &mut Vec<String>,
  values: &mut Vec<Box<dyn rusqlite::ToSql>>,
  column: &str,
  value: Option<T>,
) {
  if let Some(v) = value {
    values.push(Box::new(v));
    sets.push(format!("{column} = ?{}", values.len()));
  }
}

/// `UNIQUE(section_id, number)` violations come back as an extended SQLite
/// constraint code; everything else stays an opaque database error.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Tree join row ───────────────────────────────────────────────────────────

/// One row of the four-way reference-tree join. Chapter and below are
/// nullable because of the LEFT JOINs.
struct RawTreeRow {
  standard_id:       String,
  standard_code:     String,
  standard_name:     String,
  chapter_id:        Option<String>,
  chapter_code:      Option<String>,
  chapter_title:     Option<String>,
  chapter_status:    Option<String>,
  section_id:        Option<String>,
  section_title:     Option<String>,
  subsection_id:     Option<String>,
  subsection_number: Option<String>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A regmaps content store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Hard delete by primary key; the schema cascades through the
  /// containment chain.
  async fn delete_by_id(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![id_str])?))
      .await?;
    Ok(affected > 0)
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = Error;

  // ── Standards ──────────────────────────────────────────────────────────────

  async fn create_standard(&self, input: NewStandard) -> Result<Standard> {
    let standard = Standard {
      standard_id: Uuid::new_v4(),
      code:        input.code,
      name:        input.name,
      description: input.description,
      position:    input.position,
    };

    let id_str      = encode_uuid(standard.standard_id);
    let code        = standard.code.clone();
    let name        = standard.name.clone();
    let description = standard.description.clone();
    let position    = standard.position;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO standards (standard_id, code, name, description, position)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, code, name, description, position],
        )?;
        Ok(())
      })
      .await?;

    Ok(standard)
  }

  async fn get_standard(&self, id: Uuid) -> Result<Option<Standard>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStandard> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STANDARD_COLS} FROM standards WHERE standard_id = ?1"
              ),
              rusqlite::params![id_str],
              map_standard,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStandard::into_standard).transpose()
  }

  async fn list_standards(&self) -> Result<Vec<Standard>> {
    let raws: Vec<RawStandard> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STANDARD_COLS} FROM standards ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map([], map_standard)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStandard::into_standard).collect()
  }

  async fn update_standard(
    &self,
    id: Uuid,
    patch: StandardPatch,
  ) -> Result<Standard> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStandard> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "code", patch.code);
        push_set(&mut sets, &mut values, "name", patch.name);
        push_set(&mut sets, &mut values, "description", patch.description);
        push_set(&mut sets, &mut values, "position", patch.position);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE standards SET {} WHERE standard_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STANDARD_COLS} FROM standards WHERE standard_id = ?1"
              ),
              rusqlite::params![id_str],
              map_standard,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::StandardNotFound(id)))?
      .into_standard()
  }

  async fn delete_standard(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM standards WHERE standard_id = ?1", id)
      .await
  }

  // ── Chapters ───────────────────────────────────────────────────────────────

  async fn create_chapter(&self, input: NewChapter) -> Result<Chapter> {
    let chapter = Chapter {
      chapter_id:     Uuid::new_v4(),
      standard_id:    input.standard_id,
      code:           input.code,
      title:          input.title,
      status:         input.status,
      effective_date: input.effective_date,
      last_update:    Utc::now(),
      position:       input.position,
    };

    let id_str          = encode_uuid(chapter.chapter_id);
    let standard_id_str = encode_uuid(chapter.standard_id);
    let code            = chapter.code.clone();
    let title           = chapter.title.clone();
    let status_str      = encode_chapter_status(chapter.status).to_owned();
    let effective_str   = chapter.effective_date.map(encode_date);
    let last_update_str = encode_dt(chapter.last_update);
    let position        = chapter.position;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chapters (
             chapter_id, standard_id, code, title, status,
             effective_date, last_update, position
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            standard_id_str,
            code,
            title,
            status_str,
            effective_str,
            last_update_str,
            position,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(chapter)
  }

  async fn get_chapter(&self, id: Uuid) -> Result<Option<Chapter>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawChapter> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CHAPTER_COLS} FROM chapters WHERE chapter_id = ?1"
              ),
              rusqlite::params![id_str],
              map_chapter,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawChapter::into_chapter).transpose()
  }

  async fn chapter_detail(&self, id: Uuid) -> Result<Option<ChapterDetail>> {
    let id_str = encode_uuid(id);

    type Bundle =
      (RawChapter, Vec<RawChapterPdf>, Vec<RawSection>, Vec<RawSubsection>);

    let bundle: Option<Bundle> = self
      .conn
      .call(move |conn| {
        let chapter = conn
          .query_row(
            &format!(
              "SELECT {CHAPTER_COLS} FROM chapters WHERE chapter_id = ?1"
            ),
            rusqlite::params![id_str],
            map_chapter,
          )
          .optional()?;

        let Some(chapter) = chapter else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {PDF_COLS} FROM chapter_pdfs
           WHERE chapter_id = ?1 ORDER BY created_at ASC"
        ))?;
        let pdfs = stmt
          .query_map(rusqlite::params![id_str], map_pdf)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {SECTION_COLS} FROM sections
           WHERE chapter_id = ?1 ORDER BY position ASC"
        ))?;
        let sections = stmt
          .query_map(rusqlite::params![id_str], map_section)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT sub.subsection_id, sub.section_id, sub.number,
                  sub.content, sub.advisory_note, sub.position
           FROM subsections sub
           JOIN sections sec ON sec.section_id = sub.section_id
           WHERE sec.chapter_id = ?1
           ORDER BY sub.position ASC"
        ))?;
        let subsections = stmt
          .query_map(rusqlite::params![id_str], map_subsection)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((chapter, pdfs, sections, subsections)))
      })
      .await?;

    let Some((raw_chapter, raw_pdfs, raw_sections, raw_subsections)) = bundle
    else {
      return Ok(None);
    };

    let chapter = raw_chapter.into_chapter()?;
    let pdfs = raw_pdfs
      .into_iter()
      .map(RawChapterPdf::into_pdf)
      .collect::<Result<Vec<_>>>()?;
    let subsections = raw_subsections
      .into_iter()
      .map(RawSubsection::into_subsection)
      .collect::<Result<Vec<_>>>()?;

    let sections = raw_sections
      .into_iter()
      .map(|raw| {
        let section = raw.into_section()?;
        let owned = subsections
          .iter()
          .filter(|s| s.section_id == section.section_id)
          .cloned()
          .collect();
        Ok(SectionDetail { section, subsections: owned })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Some(ChapterDetail { chapter, pdfs, sections }))
  }

  async fn list_chapters(&self, standard_id: Uuid) -> Result<Vec<Chapter>> {
    let parent_str = encode_uuid(standard_id);

    let raws: Vec<RawChapter> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CHAPTER_COLS} FROM chapters
           WHERE standard_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_chapter)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChapter::into_chapter).collect()
  }

  async fn update_chapter(
    &self,
    id: Uuid,
    patch: ChapterPatch,
  ) -> Result<Chapter> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawChapter> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        // A chapter update always touches the freshness stamp.
        push_set(&mut sets, &mut values, "last_update", Some(now_str));
        push_set(&mut sets, &mut values, "code", patch.code);
        push_set(&mut sets, &mut values, "title", patch.title);
        push_set(
          &mut sets,
          &mut values,
          "status",
          patch.status.map(|s| encode_chapter_status(s).to_owned()),
        );
        push_set(
          &mut sets,
          &mut values,
          "effective_date",
          patch.effective_date.map(encode_date),
        );
        push_set(&mut sets, &mut values, "position", patch.position);

        values.push(Box::new(id_str.clone()));
        let sql = format!(
          "UPDATE chapters SET {} WHERE chapter_id = ?{}",
          sets.join(", "),
          values.len()
        );
        let affected =
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        if affected == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CHAPTER_COLS} FROM chapters WHERE chapter_id = ?1"
              ),
              rusqlite::params![id_str],
              map_chapter,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::ChapterNotFound(id)))?
      .into_chapter()
  }

  async fn delete_chapter(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM chapters WHERE chapter_id = ?1", id)
      .await
  }

  // ── Chapter PDFs ───────────────────────────────────────────────────────────

  async fn add_chapter_pdf(&self, input: NewChapterPdf) -> Result<ChapterPdf> {
    let pdf = ChapterPdf {
      pdf_id:      Uuid::new_v4(),
      chapter_id:  input.chapter_id,
      name:        input.name,
      url:         input.url,
      stored_name: input.stored_name,
      created_at:  Utc::now(),
    };

    let id_str         = encode_uuid(pdf.pdf_id);
    let chapter_id_str = encode_uuid(pdf.chapter_id);
    let name           = pdf.name.clone();
    let url            = pdf.url.clone();
    let stored_name    = pdf.stored_name.clone();
    let created_str    = encode_dt(pdf.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chapter_pdfs (
             pdf_id, chapter_id, name, url, stored_name, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            chapter_id_str,
            name,
            url,
            stored_name,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(pdf)
  }

  async fn list_chapter_pdfs(&self, chapter_id: Uuid) -> Result<Vec<ChapterPdf>> {
    let parent_str = encode_uuid(chapter_id);

    let raws: Vec<RawChapterPdf> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PDF_COLS} FROM chapter_pdfs
           WHERE chapter_id = ?1 ORDER BY created_at ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_pdf)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChapterPdf::into_pdf).collect()
  }

  async fn delete_chapter_pdf(&self, id: Uuid) -> Result<Option<ChapterPdf>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawChapterPdf> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {PDF_COLS} FROM chapter_pdfs WHERE pdf_id = ?1"),
            rusqlite::params![id_str],
            map_pdf,
          )
          .optional()?;
        if raw.is_some() {
          conn.execute(
            "DELETE FROM chapter_pdfs WHERE pdf_id = ?1",
            rusqlite::params![id_str],
          )?;
        }
        Ok(raw)
      })
      .await?;

    raw.map(RawChapterPdf::into_pdf).transpose()
  }

  // ── Sections ───────────────────────────────────────────────────────────────

  async fn create_section(&self, input: NewSection) -> Result<Section> {
    let section = Section {
      section_id: Uuid::new_v4(),
      chapter_id: input.chapter_id,
      title:      input.title,
      position:   input.position,
    };

    let id_str         = encode_uuid(section.section_id);
    let chapter_id_str = encode_uuid(section.chapter_id);
    let title          = section.title.clone();
    let position       = section.position;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sections (section_id, chapter_id, title, position)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, chapter_id_str, title, position],
        )?;
        Ok(())
      })
      .await?;

    Ok(section)
  }

  async fn get_section(&self, id: Uuid) -> Result<Option<Section>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SECTION_COLS} FROM sections WHERE section_id = ?1"
              ),
              rusqlite::params![id_str],
              map_section,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSection::into_section).transpose()
  }

  async fn list_sections(&self, chapter_id: Uuid) -> Result<Vec<Section>> {
    let parent_str = encode_uuid(chapter_id);

    let raws: Vec<RawSection> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SECTION_COLS} FROM sections
           WHERE chapter_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_section)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSection::into_section).collect()
  }

  async fn update_section(
    &self,
    id: Uuid,
    patch: SectionPatch,
  ) -> Result<Section> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "title", patch.title);
        push_set(&mut sets, &mut values, "position", patch.position);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE sections SET {} WHERE section_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SECTION_COLS} FROM sections WHERE section_id = ?1"
              ),
              rusqlite::params![id_str],
              map_section,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::SectionNotFound(id)))?
      .into_section()
  }

  async fn delete_section(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM sections WHERE section_id = ?1", id)
      .await
  }

  // ── Subsections ────────────────────────────────────────────────────────────

  async fn create_subsection(&self, input: NewSubsection) -> Result<Subsection> {
    let subsection = Subsection {
      subsection_id: Uuid::new_v4(),
      section_id:    input.section_id,
      number:        input.number,
      content:       input.content,
      advisory_note: input.advisory_note,
      position:      input.position,
    };

    let id_str         = encode_uuid(subsection.subsection_id);
    let section_id_str = encode_uuid(subsection.section_id);
    let number         = subsection.number.clone();
    let content        = subsection.content.clone();
    let advisory_note  = subsection.advisory_note.clone();
    let position       = subsection.position;

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subsections (
             subsection_id, section_id, number, content, advisory_note, position
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            section_id_str,
            number,
            content,
            advisory_note,
            position,
          ],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(subsection),
      Err(e) if is_unique_violation(&e) => {
        Err(Error::Core(DomainError::DuplicateSubsectionNumber {
          section_id: subsection.section_id,
          number:     subsection.number,
        }))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn get_subsection(&self, id: Uuid) -> Result<Option<Subsection>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubsection> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBSECTION_COLS} FROM subsections
                 WHERE subsection_id = ?1"
              ),
              rusqlite::params![id_str],
              map_subsection,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubsection::into_subsection).transpose()
  }

  async fn subsection_detail(
    &self,
    id: Uuid,
  ) -> Result<Option<SubsectionDetail>> {
    let id_str = encode_uuid(id);

    type Bundle =
      (RawSubsection, Vec<RawFootnote>, Vec<RawFaq>, Vec<RawRevision>);

    let bundle: Option<Bundle> = self
      .conn
      .call(move |conn| {
        let subsection = conn
          .query_row(
            &format!(
              "SELECT {SUBSECTION_COLS} FROM subsections
               WHERE subsection_id = ?1"
            ),
            rusqlite::params![id_str],
            map_subsection,
          )
          .optional()?;

        let Some(subsection) = subsection else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {FOOTNOTE_COLS} FROM footnotes
           WHERE subsection_id = ?1 ORDER BY number ASC"
        ))?;
        let footnotes = stmt
          .query_map(rusqlite::params![id_str], map_footnote)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {FAQ_COLS} FROM faqs
           WHERE subsection_id = ?1 ORDER BY position ASC"
        ))?;
        let faqs = stmt
          .query_map(rusqlite::params![id_str], map_faq)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {REVISION_COLS} FROM revisions
           WHERE subsection_id = ?1 ORDER BY position ASC"
        ))?;
        let revisions = stmt
          .query_map(rusqlite::params![id_str], map_revision)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((subsection, footnotes, faqs, revisions)))
      })
      .await?;

    let Some((raw_subsection, raw_footnotes, raw_faqs, raw_revisions)) = bundle
    else {
      return Ok(None);
    };

    Ok(Some(SubsectionDetail {
      subsection: raw_subsection.into_subsection()?,
      footnotes:  raw_footnotes
        .into_iter()
        .map(RawFootnote::into_footnote)
        .collect::<Result<Vec<_>>>()?,
      faqs:       raw_faqs
        .into_iter()
        .map(RawFaq::into_faq)
        .collect::<Result<Vec<_>>>()?,
      revisions:  raw_revisions
        .into_iter()
        .map(RawRevision::into_revision)
        .collect::<Result<Vec<_>>>()?,
    }))
  }

  async fn list_subsections(&self, section_id: Uuid) -> Result<Vec<Subsection>> {
    let parent_str = encode_uuid(section_id);

    let raws: Vec<RawSubsection> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBSECTION_COLS} FROM subsections
           WHERE section_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_subsection)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawSubsection::into_subsection)
      .collect()
  }

  async fn update_subsection(
    &self,
    id: Uuid,
    patch: SubsectionPatch,
  ) -> Result<Subsection> {
    // Read first: a precise not-found, plus the owning section for the
    // duplicate-number error when a renumber collides.
    let current = self
      .get_subsection(id)
      .await?
      .ok_or(Error::Core(DomainError::SubsectionNotFound(id)))?;

    let id_str           = encode_uuid(id);
    let attempted_number = patch.number.clone();

    let updated = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "number", patch.number);
        push_set(&mut sets, &mut values, "content", patch.content);
        push_set(&mut sets, &mut values, "advisory_note", patch.advisory_note);
        push_set(&mut sets, &mut values, "position", patch.position);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE subsections SET {} WHERE subsection_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }
        Ok(())
      })
      .await;

    match updated {
      Ok(()) => {}
      Err(e) if is_unique_violation(&e) => {
        return Err(Error::Core(DomainError::DuplicateSubsectionNumber {
          section_id: current.section_id,
          number:     attempted_number.unwrap_or(current.number),
        }));
      }
      Err(e) => return Err(e.into()),
    }

    self
      .get_subsection(id)
      .await?
      .ok_or(Error::Core(DomainError::SubsectionNotFound(id)))
  }

  async fn delete_subsection(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM subsections WHERE subsection_id = ?1", id)
      .await
  }

  // ── Footnotes ──────────────────────────────────────────────────────────────

  async fn create_footnote(&self, input: NewFootnote) -> Result<Footnote> {
    let footnote = Footnote {
      footnote_id:   Uuid::new_v4(),
      subsection_id: input.subsection_id,
      number:        input.number,
      content:       input.content,
    };

    let id_str     = encode_uuid(footnote.footnote_id);
    let parent_str = encode_uuid(footnote.subsection_id);
    let number     = footnote.number;
    let content    = footnote.content.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO footnotes (footnote_id, subsection_id, number, content)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, parent_str, number, content],
        )?;
        Ok(())
      })
      .await?;

    Ok(footnote)
  }

  async fn list_footnotes(&self, subsection_id: Uuid) -> Result<Vec<Footnote>> {
    let parent_str = encode_uuid(subsection_id);

    let raws: Vec<RawFootnote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FOOTNOTE_COLS} FROM footnotes
           WHERE subsection_id = ?1 ORDER BY number ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_footnote)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFootnote::into_footnote).collect()
  }

  async fn update_footnote(
    &self,
    id: Uuid,
    patch: FootnotePatch,
  ) -> Result<Footnote> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFootnote> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "number", patch.number);
        push_set(&mut sets, &mut values, "content", patch.content);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE footnotes SET {} WHERE footnote_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FOOTNOTE_COLS} FROM footnotes WHERE footnote_id = ?1"
              ),
              rusqlite::params![id_str],
              map_footnote,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::FootnoteNotFound(id)))?
      .into_footnote()
  }

  async fn delete_footnote(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM footnotes WHERE footnote_id = ?1", id)
      .await
  }

  // ── FAQs ───────────────────────────────────────────────────────────────────

  async fn create_faq(&self, input: NewFaq) -> Result<Faq> {
    let faq = Faq {
      faq_id:        Uuid::new_v4(),
      subsection_id: input.subsection_id,
      question:      input.question,
      answer:        input.answer,
      position:      input.position,
    };

    let id_str     = encode_uuid(faq.faq_id);
    let parent_str = encode_uuid(faq.subsection_id);
    let question   = faq.question.clone();
    let answer     = faq.answer.clone();
    let position   = faq.position;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO faqs (faq_id, subsection_id, question, answer, position)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, parent_str, question, answer, position],
        )?;
        Ok(())
      })
      .await?;

    Ok(faq)
  }

  async fn list_faqs(&self, subsection_id: Uuid) -> Result<Vec<Faq>> {
    let parent_str = encode_uuid(subsection_id);

    let raws: Vec<RawFaq> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FAQ_COLS} FROM faqs
           WHERE subsection_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_faq)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFaq::into_faq).collect()
  }

  async fn update_faq(&self, id: Uuid, patch: FaqPatch) -> Result<Faq> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFaq> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "question", patch.question);
        push_set(&mut sets, &mut values, "answer", patch.answer);
        push_set(&mut sets, &mut values, "position", patch.position);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE faqs SET {} WHERE faq_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {FAQ_COLS} FROM faqs WHERE faq_id = ?1"),
              rusqlite::params![id_str],
              map_faq,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::Core(DomainError::FaqNotFound(id)))?.into_faq()
  }

  async fn delete_faq(&self, id: Uuid) -> Result<bool> {
    self.delete_by_id("DELETE FROM faqs WHERE faq_id = ?1", id).await
  }

  // ── Revisions ──────────────────────────────────────────────────────────────

  async fn create_revision(&self, input: NewRevision) -> Result<Revision> {
    let revision = Revision {
      revision_id:   Uuid::new_v4(),
      subsection_id: input.subsection_id,
      title:         input.title,
      content:       input.content,
      revision_date: input.revision_date,
      position:      input.position,
    };

    let id_str     = encode_uuid(revision.revision_id);
    let parent_str = encode_uuid(revision.subsection_id);
    let title      = revision.title.clone();
    let content    = revision.content.clone();
    let date_str   = encode_date(revision.revision_date);
    let position   = revision.position;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO revisions (
             revision_id, subsection_id, title, content, revision_date, position
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str, parent_str, title, content, date_str, position,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(revision)
  }

  async fn list_revisions(&self, subsection_id: Uuid) -> Result<Vec<Revision>> {
    let parent_str = encode_uuid(subsection_id);

    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVISION_COLS} FROM revisions
           WHERE subsection_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str], map_revision)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }

  async fn update_revision(
    &self,
    id: Uuid,
    patch: RevisionPatch,
  ) -> Result<Revision> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        push_set(&mut sets, &mut values, "title", patch.title);
        push_set(&mut sets, &mut values, "content", patch.content);
        push_set(
          &mut sets,
          &mut values,
          "revision_date",
          patch.revision_date.map(encode_date),
        );
        push_set(&mut sets, &mut values, "position", patch.position);

        if !sets.is_empty() {
          values.push(Box::new(id_str.clone()));
          let sql = format!(
            "UPDATE revisions SET {} WHERE revision_id = ?{}",
            sets.join(", "),
            values.len()
          );
          conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {REVISION_COLS} FROM revisions WHERE revision_id = ?1"
              ),
              rusqlite::params![id_str],
              map_revision,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::RevisionNotFound(id)))?
      .into_revision()
  }

  async fn delete_revision(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM revisions WHERE revision_id = ?1", id)
      .await
  }

  // ── Aggregate reads ────────────────────────────────────────────────────────

  async fn reference_tree(&self) -> Result<Vec<StandardNode>> {
    let rows: Vec<RawTreeRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.standard_id, s.code, s.name,
             c.chapter_id, c.code, c.title, c.status,
             sec.section_id, sec.title,
             sub.subsection_id, sub.number
           FROM standards s
           LEFT JOIN chapters    c   ON c.standard_id  = s.standard_id
           LEFT JOIN sections    sec ON sec.chapter_id = c.chapter_id
           LEFT JOIN subsections sub ON sub.section_id = sec.section_id
           ORDER BY s.position, s.code,
                    c.position, c.code,
                    sec.position, sec.title,
                    sub.position, sub.number",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawTreeRow {
              standard_id:       row.get(0)?,
              standard_code:     row.get(1)?,
              standard_name:     row.get(2)?,
              chapter_id:        row.get(3)?,
              chapter_code:      row.get(4)?,
              chapter_title:     row.get(5)?,
              chapter_status:    row.get(6)?,
              section_id:        row.get(7)?,
              section_title:     row.get(8)?,
              subsection_id:     row.get(9)?,
              subsection_number: row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    // The join is ordered, so the tree assembles in one pass by watching the
    // parent ids change.
    let mut tree: Vec<StandardNode> = Vec::new();
    let mut last_standard: Option<String> = None;
    let mut last_chapter: Option<String> = None;
    let mut last_section: Option<String> = None;

    for row in rows {
      if last_standard.as_deref() != Some(row.standard_id.as_str()) {
        tree.push(StandardNode {
          standard_id: decode_uuid(&row.standard_id)?,
          code:        row.standard_code.clone(),
          name:        row.standard_name.clone(),
          chapters:    Vec::new(),
        });
        last_standard = Some(row.standard_id.clone());
        last_chapter = None;
        last_section = None;
      }
      let Some(standard) = tree.last_mut() else { continue };

      let Some(chapter_id) = row.chapter_id.as_deref() else { continue };
      if last_chapter.as_deref() != Some(chapter_id) {
        standard.chapters.push(ChapterNode {
          chapter_id: decode_uuid(chapter_id)?,
          code:       row.chapter_code.clone().unwrap_or_default(),
          title:      row.chapter_title.clone().unwrap_or_default(),
          status:     decode_chapter_status(
            row.chapter_status.as_deref().unwrap_or("current"),
          )?,
          sections:   Vec::new(),
        });
        last_chapter = Some(chapter_id.to_owned());
        last_section = None;
      }
      let Some(chapter) = standard.chapters.last_mut() else { continue };

      let Some(section_id) = row.section_id.as_deref() else { continue };
      if last_section.as_deref() != Some(section_id) {
        chapter.sections.push(SectionNode {
          section_id:  decode_uuid(section_id)?,
          title:       row.section_title.clone().unwrap_or_default(),
          subsections: Vec::new(),
        });
        last_section = Some(section_id.to_owned());
      }
      let Some(section) = chapter.sections.last_mut() else { continue };

      if let (Some(sub_id), Some(number)) =
        (row.subsection_id.as_deref(), row.subsection_number.as_deref())
      {
        section.subsections.push(SubsectionNode {
          subsection_id: decode_uuid(sub_id)?,
          number:        number.to_owned(),
        });
      }
    }

    Ok(tree)
  }

  async fn search(&self, query: &str) -> Result<SearchResults> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
      return Err(Error::Core(DomainError::QueryTooShort {
        min: MIN_QUERY_LEN,
      }));
    }

    // SQLite LIKE is case-insensitive for ASCII, which is the contract here.
    let pattern = format!("%{trimmed}%");

    type StandardRow = (String, String, String);
    type ChapterRow = (String, String, String, String);
    type SectionRow = (String, String, String, String);
    type SubsectionRow = (String, String, String, String, String);
    type Buckets =
      (Vec<StandardRow>, Vec<ChapterRow>, Vec<SectionRow>, Vec<SubsectionRow>);

    let (standards, chapters, sections, subsections): Buckets = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT standard_id, code, name FROM standards
           WHERE code LIKE ?1 OR name LIKE ?1 OR description LIKE ?1
           ORDER BY position ASC LIMIT ?2",
        )?;
        let standards = stmt
          .query_map(
            rusqlite::params![pattern, STANDARD_CAP as i64],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT c.chapter_id, s.code, c.code, c.title
           FROM chapters c
           JOIN standards s ON s.standard_id = c.standard_id
           WHERE c.code LIKE ?1 OR c.title LIKE ?1
           ORDER BY s.position, c.position LIMIT ?2",
        )?;
        let chapters = stmt
          .query_map(
            rusqlite::params![pattern, CHAPTER_CAP as i64],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT sec.section_id, s.code, c.code, sec.title
           FROM sections sec
           JOIN chapters  c ON c.chapter_id  = sec.chapter_id
           JOIN standards s ON s.standard_id = c.standard_id
           WHERE sec.title LIKE ?1
           ORDER BY c.position, sec.position LIMIT ?2",
        )?;
        let sections = stmt
          .query_map(
            rusqlite::params![pattern, SECTION_CAP as i64],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT sub.subsection_id, s.code, c.code, sub.number, c.title
           FROM subsections sub
           JOIN sections  sec ON sec.section_id = sub.section_id
           JOIN chapters  c   ON c.chapter_id   = sec.chapter_id
           JOIN standards s   ON s.standard_id  = c.standard_id
           WHERE sub.number LIKE ?1 OR sub.content LIKE ?1
           ORDER BY c.position, sec.position, sub.position LIMIT ?2",
        )?;
        let subsections = stmt
          .query_map(
            rusqlite::params![pattern, SUBSECTION_CAP as i64],
            |row| {
              Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
              ))
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((standards, chapters, sections, subsections))
      })
      .await?;

    let standards = standards
      .into_iter()
      .map(|(id, code, name)| {
        Ok(SearchHit::standard(decode_uuid(&id)?, &code, &name))
      })
      .collect::<Result<Vec<_>>>()?;

    let chapters = chapters
      .into_iter()
      .map(|(id, standard_code, code, title)| {
        Ok(SearchHit::chapter(
          decode_uuid(&id)?,
          &standard_code,
          &code,
          &title,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let sections = sections
      .into_iter()
      .map(|(id, standard_code, chapter_code, title)| {
        Ok(SearchHit::section(
          decode_uuid(&id)?,
          &standard_code,
          &chapter_code,
          &title,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let subsections = subsections
      .into_iter()
      .map(|(id, standard_code, chapter_code, number, chapter_title)| {
        Ok(SearchHit::subsection(
          decode_uuid(&id)?,
          &standard_code,
          &chapter_code,
          &number,
          &chapter_title,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(SearchResults::assemble(standards, chapters, sections, subsections))
  }

  // ── Notifications ──────────────────────────────────────────────────────────

  async fn publish_notification(
    &self,
    input: NewNotification,
  ) -> Result<Notification> {
    let notification = Notification {
      notification_id: Uuid::new_v4(),
      title:           input.title,
      body:            input.body,
      created_at:      Utc::now(),
      read:            false,
    };

    let id_str      = encode_uuid(notification.notification_id);
    let title       = notification.title.clone();
    let body        = notification.body.clone();
    let created_str = encode_dt(notification.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (notification_id, title, body, created_at, read)
           VALUES (?1, ?2, ?3, ?4, 0)",
          rusqlite::params![id_str, title, body, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  async fn list_notifications(&self) -> Result<Vec<Notification>> {
    let raws: Vec<RawNotification> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLS} FROM notifications
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], map_notification)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawNotification::into_notification)
      .collect()
  }

  async fn unread_notifications(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM notifications WHERE read = 0",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn mark_notification_read(&self, id: Uuid) -> Result<Notification> {
    let id_str = encode_uuid(id);

    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE notifications SET read = 1 WHERE notification_id = ?1",
          rusqlite::params![id_str],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTIFICATION_COLS} FROM notifications
                 WHERE notification_id = ?1"
              ),
              rusqlite::params![id_str],
              map_notification,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::NotificationNotFound(id)))?
      .into_notification()
  }

  async fn delete_notification(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id(
        "DELETE FROM notifications WHERE notification_id = ?1",
        id,
      )
      .await
  }

  // ── Workshop registrations ─────────────────────────────────────────────────

  async fn register_workshop(
    &self,
    input: NewRegistration,
  ) -> Result<WorkshopRegistration> {
    let registration = WorkshopRegistration {
      registration_id: Uuid::new_v4(),
      workshop:        input.workshop,
      name:            input.name,
      email:           input.email,
      company:         input.company,
      status:          RegistrationStatus::Pending,
      registered_at:   Utc::now(),
    };

    let id_str         = encode_uuid(registration.registration_id);
    let workshop       = registration.workshop.clone();
    let name           = registration.name.clone();
    let email          = registration.email.clone();
    let company        = registration.company.clone();
    let status_str     = encode_registration_status(registration.status).to_owned();
    let registered_str = encode_dt(registration.registered_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO workshop_registrations (
             registration_id, workshop, name, email, company, status, registered_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            workshop,
            name,
            email,
            company,
            status_str,
            registered_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(registration)
  }

  async fn list_registrations(&self) -> Result<Vec<WorkshopRegistration>> {
    let raws: Vec<RawRegistration> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REGISTRATION_COLS} FROM workshop_registrations
           ORDER BY registered_at DESC"
        ))?;
        let rows = stmt
          .query_map([], map_registration)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRegistration::into_registration)
      .collect()
  }

  async fn set_registration_status(
    &self,
    id: Uuid,
    status: RegistrationStatus,
  ) -> Result<WorkshopRegistration> {
    let id_str     = encode_uuid(id);
    let status_str = encode_registration_status(status).to_owned();

    let raw: Option<RawRegistration> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE workshop_registrations SET status = ?1 WHERE registration_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {REGISTRATION_COLS} FROM workshop_registrations
                 WHERE registration_id = ?1"
              ),
              rusqlite::params![id_str],
              map_registration,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::Core(DomainError::RegistrationNotFound(id)))?
      .into_registration()
  }

  async fn delete_registration(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id(
        "DELETE FROM workshop_registrations WHERE registration_id = ?1",
        id,
      )
      .await
  }
}
