//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! (`YYYY-MM-DD`). UUIDs are stored as hyphenated lowercase strings. Enums
//! are stored as their lowercase wire names.

use chrono::{DateTime, NaiveDate, Utc};
use regmaps_core::{
  chapter::{Chapter, ChapterPdf, ChapterStatus},
  notification::Notification,
  section::Section,
  standard::Standard,
  subsection::{Faq, Footnote, Revision, Subsection},
  workshop::{RegistrationStatus, WorkshopRegistration},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ChapterStatus ───────────────────────────────────────────────────────────

pub fn encode_chapter_status(s: ChapterStatus) -> &'static str {
  match s {
    ChapterStatus::Current => "current",
    ChapterStatus::Archived => "archived",
  }
}

pub fn decode_chapter_status(s: &str) -> Result<ChapterStatus> {
  match s {
    "current" => Ok(ChapterStatus::Current),
    "archived" => Ok(ChapterStatus::Archived),
    other => Err(Error::DateParse(format!("unknown chapter status: {other:?}"))),
  }
}

// ─── RegistrationStatus ──────────────────────────────────────────────────────

pub fn encode_registration_status(s: RegistrationStatus) -> &'static str {
  match s {
    RegistrationStatus::Pending => "pending",
    RegistrationStatus::Confirmed => "confirmed",
    RegistrationStatus::Cancelled => "cancelled",
  }
}

pub fn decode_registration_status(s: &str) -> Result<RegistrationStatus> {
  match s {
    "pending" => Ok(RegistrationStatus::Pending),
    "confirmed" => Ok(RegistrationStatus::Confirmed),
    "cancelled" => Ok(RegistrationStatus::Cancelled),
    other => Err(Error::DateParse(format!(
      "unknown registration status: {other:?}"
    ))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `standards` row.
pub struct RawStandard {
  pub standard_id: String,
  pub code:        String,
  pub name:        String,
  pub description: Option<String>,
  pub position:    i64,
}

impl RawStandard {
  pub fn into_standard(self) -> Result<Standard> {
    Ok(Standard {
      standard_id: decode_uuid(&self.standard_id)?,
      code:        self.code,
      name:        self.name,
      description: self.description,
      position:    self.position,
    })
  }
}

/// Raw strings read directly from a `chapters` row.
pub struct RawChapter {
  pub chapter_id:     String,
  pub standard_id:    String,
  pub code:           String,
  pub title:          String,
  pub status:         String,
  pub effective_date: Option<String>,
  pub last_update:    String,
  pub position:       i64,
}

impl RawChapter {
  pub fn into_chapter(self) -> Result<Chapter> {
    Ok(Chapter {
      chapter_id:     decode_uuid(&self.chapter_id)?,
      standard_id:    decode_uuid(&self.standard_id)?,
      code:           self.code,
      title:          self.title,
      status:         decode_chapter_status(&self.status)?,
      effective_date: self.effective_date.as_deref().map(decode_date).transpose()?,
      last_update:    decode_dt(&self.last_update)?,
      position:       self.position,
    })
  }
}

/// Raw strings read directly from a `chapter_pdfs` row.
pub struct RawChapterPdf {
  pub pdf_id:      String,
  pub chapter_id:  String,
  pub name:        String,
  pub url:         String,
  pub stored_name: String,
  pub created_at:  String,
}

impl RawChapterPdf {
  pub fn into_pdf(self) -> Result<ChapterPdf> {
    Ok(ChapterPdf {
      pdf_id:      decode_uuid(&self.pdf_id)?,
      chapter_id:  decode_uuid(&self.chapter_id)?,
      name:        self.name,
      url:         self.url,
      stored_name: self.stored_name,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `sections` row.
pub struct RawSection {
  pub section_id: String,
  pub chapter_id: String,
  pub title:      String,
  pub position:   i64,
}

impl RawSection {
  pub fn into_section(self) -> Result<Section> {
    Ok(Section {
      section_id: decode_uuid(&self.section_id)?,
      chapter_id: decode_uuid(&self.chapter_id)?,
      title:      self.title,
      position:   self.position,
    })
  }
}

/// Raw strings read directly from a `subsections` row.
pub struct RawSubsection {
  pub subsection_id: String,
  pub section_id:    String,
  pub number:        String,
  pub content:       String,
  pub advisory_note: Option<String>,
  pub position:      i64,
}

impl RawSubsection {
  pub fn into_subsection(self) -> Result<Subsection> {
    Ok(Subsection {
      subsection_id: decode_uuid(&self.subsection_id)?,
      section_id:    decode_uuid(&self.section_id)?,
      number:        self.number,
      content:       self.content,
      advisory_note: self.advisory_note,
      position:      self.position,
    })
  }
}

/// Raw strings read directly from a `footnotes` row.
pub struct RawFootnote {
  pub footnote_id:   String,
  pub subsection_id: String,
  pub number:        i64,
  pub content:       String,
}

impl RawFootnote {
  pub fn into_footnote(self) -> Result<Footnote> {
    Ok(Footnote {
      footnote_id:   decode_uuid(&self.footnote_id)?,
      subsection_id: decode_uuid(&self.subsection_id)?,
      number:        self.number,
      content:       self.content,
    })
  }
}

/// Raw strings read directly from a `faqs` row.
pub struct RawFaq {
  pub faq_id:        String,
  pub subsection_id: String,
  pub question:      String,
  pub answer:        String,
  pub position:      i64,
}

impl RawFaq {
  pub fn into_faq(self) -> Result<Faq> {
    Ok(Faq {
      faq_id:        decode_uuid(&self.faq_id)?,
      subsection_id: decode_uuid(&self.subsection_id)?,
      question:      self.question,
      answer:        self.answer,
      position:      self.position,
    })
  }
}

/// Raw strings read directly from a `revisions` row.
pub struct RawRevision {
  pub revision_id:   String,
  pub subsection_id: String,
  pub title:         String,
  pub content:       String,
  pub revision_date: String,
  pub position:      i64,
}

impl RawRevision {
  pub fn into_revision(self) -> Result<Revision> {
    Ok(Revision {
      revision_id:   decode_uuid(&self.revision_id)?,
      subsection_id: decode_uuid(&self.subsection_id)?,
      title:         self.title,
      content:       self.content,
      revision_date: decode_date(&self.revision_date)?,
      position:      self.position,
    })
  }
}

/// Raw strings read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub title:           String,
  pub body:            String,
  pub created_at:      String,
  pub read:            bool,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      title:           self.title,
      body:            self.body,
      created_at:      decode_dt(&self.created_at)?,
      read:            self.read,
    })
  }
}

/// Raw strings read directly from a `workshop_registrations` row.
pub struct RawRegistration {
  pub registration_id: String,
  pub workshop:        String,
  pub name:            String,
  pub email:           String,
  pub company:         Option<String>,
  pub status:          String,
  pub registered_at:   String,
}

impl RawRegistration {
  pub fn into_registration(self) -> Result<WorkshopRegistration> {
    Ok(WorkshopRegistration {
      registration_id: decode_uuid(&self.registration_id)?,
      workshop:        self.workshop,
      name:            self.name,
      email:           self.email,
      company:         self.company,
      status:          decode_registration_status(&self.status)?,
      registered_at:   decode_dt(&self.registered_at)?,
    })
  }
}
