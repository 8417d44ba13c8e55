//! SQL schema for the job-board SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Applications are embedded in the professional row as a JSON array, so the
-- whole aggregate is read and written as one document.
CREATE TABLE IF NOT EXISTS professionals (
    professional_id TEXT PRIMARY KEY,
    cedula          TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    gender          TEXT NOT NULL,
    professions     TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    applications    TEXT NOT NULL DEFAULT '[]'    -- JSON array of {vacancy_id, filed_at}
);

CREATE TABLE IF NOT EXISTS employers (
    employer_id TEXT PRIMARY KEY,
    cedula      TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL    -- 'individual' | 'organization'
);

CREATE TABLE IF NOT EXISTS vacancies (
    vacancy_id   TEXT PRIMARY KEY,
    employer_id  TEXT NOT NULL REFERENCES employers(employer_id),
    title        TEXT NOT NULL,
    area         TEXT NOT NULL,
    description  TEXT NOT NULL,
    published_at TEXT NOT NULL    -- ISO 8601 UTC
);

-- One record per professional.
CREATE TABLE IF NOT EXISTS records (
    record_id       TEXT PRIMARY KEY,
    professional_id TEXT NOT NULL UNIQUE REFERENCES professionals(professional_id),
    experiences     TEXT NOT NULL DEFAULT '[]',   -- JSON array of experiences
    created_at      TEXT NOT NULL
);

-- At most one image representation is stored per title.
CREATE TABLE IF NOT EXISTS titles (
    title_id         TEXT PRIMARY KEY,
    record_id        TEXT NOT NULL REFERENCES records(record_id),
    name             TEXT NOT NULL,
    image_path       TEXT,
    image_media_type TEXT,
    image_data       BLOB,
    created_at       TEXT NOT NULL,
    CHECK (image_path IS NULL OR image_data IS NULL)
);

CREATE INDEX IF NOT EXISTS vacancies_area_idx     ON vacancies(area);
CREATE INDEX IF NOT EXISTS vacancies_employer_idx ON vacancies(employer_id);
CREATE INDEX IF NOT EXISTS titles_record_idx      ON titles(record_id);

PRAGMA user_version = 1;
";
