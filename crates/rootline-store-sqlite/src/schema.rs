//! SQL schema for the rootline SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS sources (
    source_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    fingerprint TEXT NOT NULL UNIQUE,  -- SHA-256 hex of the raw input bytes
    imported_at TEXT NOT NULL          -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS places (
    place_id        TEXT PRIMARY KEY,
    source_id       TEXT NOT NULL REFERENCES sources(source_id) ON DELETE CASCADE,
    name            TEXT NOT NULL,
    normalized_name TEXT NOT NULL,
    parent_id       TEXT REFERENCES places(place_id),
    latitude        REAL,
    longitude       REAL
);

-- Rows are written only by a source commit and removed only by a source
-- deletion; no UPDATE is ever issued against the entity tables.
CREATE TABLE IF NOT EXISTS persons (
    person_id      TEXT PRIMARY KEY,
    source_id      TEXT NOT NULL REFERENCES sources(source_id) ON DELETE CASCADE,
    record_id      TEXT,             -- source-local cross-reference id
    given_names    TEXT,
    surname        TEXT,
    sex            TEXT NOT NULL DEFAULT 'unknown',
    birth_date     TEXT,             -- JSON-encoded partial date or NULL
    birth_place_id TEXT REFERENCES places(place_id),
    death_date     TEXT,
    death_place_id TEXT REFERENCES places(place_id),
    living         INTEGER NOT NULL DEFAULT 0,
    notes          TEXT
);

-- Endpoint FKs cascade so deleting a source can never leave a relationship
-- with a missing endpoint, whichever source owns the edge.
CREATE TABLE IF NOT EXISTS relationships (
    relationship_id TEXT PRIMARY KEY,
    source_id       TEXT NOT NULL REFERENCES sources(source_id) ON DELETE CASCADE,
    person_a        TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    person_b        TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    kind            TEXT NOT NULL,   -- 'parent-of' | 'spouse-of' | 'sibling-of'
    started         TEXT,
    ended           TEXT,
    confidence      TEXT NOT NULL DEFAULT 'medium',
    CHECK (person_a != person_b)
);

CREATE TABLE IF NOT EXISTS events (
    event_id        TEXT PRIMARY KEY,
    source_id       TEXT NOT NULL REFERENCES sources(source_id) ON DELETE CASCADE,
    person_id       TEXT REFERENCES persons(person_id) ON DELETE CASCADE,
    relationship_id TEXT REFERENCES relationships(relationship_id) ON DELETE CASCADE,
    kind            TEXT NOT NULL,
    raw_tag         TEXT,
    date            TEXT,
    place_id        TEXT REFERENCES places(place_id),
    note            TEXT,
    CHECK ((person_id IS NULL) != (relationship_id IS NULL))
);

CREATE INDEX IF NOT EXISTS persons_source_idx        ON persons(source_id);
CREATE INDEX IF NOT EXISTS persons_surname_idx       ON persons(surname);
CREATE INDEX IF NOT EXISTS persons_given_idx         ON persons(given_names);
CREATE INDEX IF NOT EXISTS relationships_source_idx  ON relationships(source_id);
CREATE INDEX IF NOT EXISTS relationships_a_idx       ON relationships(person_a);
CREATE INDEX IF NOT EXISTS relationships_b_idx       ON relationships(person_b);
CREATE INDEX IF NOT EXISTS events_source_idx         ON events(source_id);
CREATE INDEX IF NOT EXISTS events_person_idx         ON events(person_id);
CREATE INDEX IF NOT EXISTS places_source_idx         ON places(source_id);
CREATE INDEX IF NOT EXISTS places_norm_idx           ON places(source_id, normalized_name);

PRAGMA user_version = 1;
";
