//! SQL schema for the Lovers' Base SQLite store.
//!
//! Executed on every connection open. `PRAGMA user_version` records the
//! schema generation for future migrations.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Plain REFERENCES (NO ACTION) blocks deleting referenced rows and reports
-- SQLITE_CONSTRAINT_FOREIGNKEY; RESTRICT would report a trigger failure.

-- Id allocator shared by persons and participants.
-- AUTOINCREMENT keeps ids from being reused after deletion.
CREATE TABLE IF NOT EXISTS individuals (
    id INTEGER PRIMARY KEY AUTOINCREMENT
);

-- Contact data; deleting a row anonymises the individual.
CREATE TABLE IF NOT EXISTS persons (
    id          INTEGER PRIMARY KEY REFERENCES individuals(id),
    first_names TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    nickname    TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT,
    allergies   TEXT
);

CREATE TABLE IF NOT EXISTS language_proficiencies (
    person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    priority  INTEGER NOT NULL,
    language  TEXT NOT NULL CHECK (length(language) = 2),
    PRIMARY KEY (person_id, priority)
);

CREATE TABLE IF NOT EXISTS participants (
    id         INTEGER PRIMARY KEY REFERENCES individuals(id),
    birth_year INTEGER,
    genitalia  TEXT NOT NULL    -- 'female' | 'male' | 'other'
);

CREATE TABLE IF NOT EXISTS orientations (
    id      INTEGER PRIMARY KEY REFERENCES participants(id) ON DELETE CASCADE,
    female  INTEGER,
    male    INTEGER,
    other   INTEGER,
    comment TEXT
);

CREATE TABLE IF NOT EXISTS locations (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL UNIQUE,
    address TEXT
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    kind        TEXT NOT NULL,
    start_time  TEXT NOT NULL,   -- RFC 3339 UTC
    end_time    TEXT NOT NULL,
    language    TEXT,
    location_id INTEGER REFERENCES locations(id)
);

-- invitation_source_id must point into the same event and must not close a
-- cycle; both are checked by the store before writing, not here.
CREATE TABLE IF NOT EXISTS participations (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_id       INTEGER NOT NULL REFERENCES participants(id),
    event_id             INTEGER NOT NULL REFERENCES events(id),
    role                 TEXT NOT NULL,
    notes                TEXT,
    invitation_source_id INTEGER REFERENCES participations(id),
    UNIQUE (participant_id, event_id)
);

-- Strictly append-only; the triggers below refuse UPDATE and DELETE.
CREATE TABLE IF NOT EXISTS status_log (
    participation_id INTEGER NOT NULL REFERENCES participations(id),
    position         INTEGER NOT NULL CHECK (position >= 0),
    timestamp        TEXT NOT NULL,   -- when it happened, may be backdated
    status           TEXT NOT NULL,
    notes            TEXT,
    PRIMARY KEY (participation_id, position)
) WITHOUT ROWID;

CREATE TRIGGER IF NOT EXISTS status_log_no_update
BEFORE UPDATE ON status_log
BEGIN
    SELECT RAISE(ABORT, 'status log entries are immutable');
END;

CREATE TRIGGER IF NOT EXISTS status_log_no_delete
BEFORE DELETE ON status_log
BEGIN
    SELECT RAISE(ABORT, 'status log entries are immutable');
END;

CREATE INDEX IF NOT EXISTS participations_event_idx  ON participations(event_id);
CREATE INDEX IF NOT EXISTS participations_source_idx ON participations(invitation_source_id);

PRAGMA user_version = 1;
";
