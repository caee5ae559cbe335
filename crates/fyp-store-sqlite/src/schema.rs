//! SQL schema for the FYP portal SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    display_name  TEXT NOT NULL,
    role          TEXT NOT NULL,   -- 'student' | 'faculty' | 'admin'
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Bearer sessions; only the SHA-256 hex digest of a token is ever stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES accounts(user_id),
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS faculty (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL,
    domain       TEXT NOT NULL,    -- Domain discriminant, snake_case
    slots        INTEGER NOT NULL CHECK (slots >= 0),
    office_hours TEXT NOT NULL
);

-- supervisor_id deliberately carries no foreign key: proposals outlive the
-- faculty records they reference, keeping the submitted history intact.
CREATE TABLE IF NOT EXISTS proposals (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    supervisor_id   TEXT NOT NULL,
    supervisor_name TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending',
    submitted_by    TEXT NOT NULL,   -- never updated after insert
    submitted_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    student_name    TEXT NOT NULL,
    student_email   TEXT NOT NULL,
    comments        TEXT NOT NULL DEFAULT '[]'   -- append-only JSON array
);

-- Slots are referentially tied to faculty and removed with them.
CREATE TABLE IF NOT EXISTS evaluation_slots (
    id           TEXT PRIMARY KEY,
    faculty_name TEXT NOT NULL,
    faculty_id   TEXT NOT NULL REFERENCES faculty(id),
    date         TEXT NOT NULL,
    time         TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'available'
);

CREATE INDEX IF NOT EXISTS sessions_user_idx      ON sessions(user_id);
CREATE INDEX IF NOT EXISTS proposals_by_idx       ON proposals(submitted_by);
CREATE INDEX IF NOT EXISTS proposals_at_idx       ON proposals(submitted_at);
CREATE INDEX IF NOT EXISTS slots_faculty_idx      ON evaluation_slots(faculty_id);

PRAGMA user_version = 1;
";
