//! SQL schema for the regmaps SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The containment chain (standard → chapter → section → subsection →
/// {footnote, faq, revision}) cascades deletes through the foreign keys.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS standards (
    standard_id TEXT PRIMARY KEY,
    code        TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    position    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS chapters (
    chapter_id     TEXT PRIMARY KEY,
    standard_id    TEXT NOT NULL REFERENCES standards(standard_id) ON DELETE CASCADE,
    code           TEXT NOT NULL,
    title          TEXT NOT NULL,
    status         TEXT NOT NULL DEFAULT 'current',  -- 'current' | 'archived'
    effective_date TEXT,             -- ISO 8601 calendar date or NULL
    last_update    TEXT NOT NULL,    -- RFC 3339; stamped on every update
    position       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS chapter_pdfs (
    pdf_id      TEXT PRIMARY KEY,
    chapter_id  TEXT NOT NULL REFERENCES chapters(chapter_id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    url         TEXT NOT NULL,
    stored_name TEXT NOT NULL,       -- object name used for file deletion
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sections (
    section_id TEXT PRIMARY KEY,
    chapter_id TEXT NOT NULL REFERENCES chapters(chapter_id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    position   INTEGER NOT NULL DEFAULT 0
);

-- No two subsections under one section may share a number. The UNIQUE
-- constraint makes the duplicate check atomic with the insert.
CREATE TABLE IF NOT EXISTS subsections (
    subsection_id TEXT PRIMARY KEY,
    section_id    TEXT NOT NULL REFERENCES sections(section_id) ON DELETE CASCADE,
    number        TEXT NOT NULL,
    content       TEXT NOT NULL,
    advisory_note TEXT,
    position      INTEGER NOT NULL DEFAULT 0,
    UNIQUE (section_id, number)
);

CREATE TABLE IF NOT EXISTS footnotes (
    footnote_id   TEXT PRIMARY KEY,
    subsection_id TEXT NOT NULL REFERENCES subsections(subsection_id) ON DELETE CASCADE,
    number        INTEGER NOT NULL,
    content       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS faqs (
    faq_id        TEXT PRIMARY KEY,
    subsection_id TEXT NOT NULL REFERENCES subsections(subsection_id) ON DELETE CASCADE,
    question      TEXT NOT NULL,
    answer        TEXT NOT NULL,
    position      INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS revisions (
    revision_id   TEXT PRIMARY KEY,
    subsection_id TEXT NOT NULL REFERENCES subsections(subsection_id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,
    revision_date TEXT NOT NULL,     -- ISO 8601 calendar date
    position      INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    read            INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS workshop_registrations (
    registration_id TEXT PRIMARY KEY,
    workshop        TEXT NOT NULL,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    company         TEXT,
    status          TEXT NOT NULL DEFAULT 'pending',  -- 'pending' | 'confirmed' | 'cancelled'
    registered_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS chapters_standard_idx    ON chapters(standard_id);
CREATE INDEX IF NOT EXISTS pdfs_chapter_idx         ON chapter_pdfs(chapter_id);
CREATE INDEX IF NOT EXISTS sections_chapter_idx     ON sections(chapter_id);
CREATE INDEX IF NOT EXISTS subsections_section_idx  ON subsections(section_id);
CREATE INDEX IF NOT EXISTS footnotes_subsection_idx ON footnotes(subsection_id);
CREATE INDEX IF NOT EXISTS faqs_subsection_idx      ON faqs(subsection_id);
CREATE INDEX IF NOT EXISTS revisions_subsection_idx ON revisions(subsection_id);

PRAGMA user_version = 1;
";
