//! SQL schema for the Mamute SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS students (
    student_id          TEXT PRIMARY KEY,
    student_number      INTEGER NOT NULL UNIQUE,
    first_name          TEXT,
    last_name           TEXT,
    membership_standing TEXT NOT NULL DEFAULT 'active',  -- 'active' | 'inactive' | 'overdue'
    created_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS class_schedules (
    schedule_id   TEXT PRIMARY KEY,
    class_type    TEXT NOT NULL,
    instructor_id TEXT,
    day_of_week   INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
    start_time    TEXT NOT NULL,   -- 'HH:MM' wall clock
    end_time      TEXT NOT NULL,
    timezone      TEXT NOT NULL,   -- IANA identifier
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL
);

-- account_id comes from the auth subsystem; deliberately no FK so links can
-- outlive an account backend swap.
CREATE TABLE IF NOT EXISTS student_access (
    account_id TEXT NOT NULL,
    student_id TEXT NOT NULL REFERENCES students(student_id),
    role       TEXT NOT NULL,      -- 'self' | 'guardian'
    created_at TEXT NOT NULL,
    UNIQUE (account_id, student_id)
);

-- Attendance is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS attendance (
    attendance_id     TEXT PRIMARY KEY,
    student_id        TEXT NOT NULL REFERENCES students(student_id),
    schedule_id       TEXT REFERENCES class_schedules(schedule_id),
    scanned_at        TEXT NOT NULL,       -- ISO 8601 UTC
    device_id         TEXT,
    source            TEXT NOT NULL,       -- 'frontdesk' | 'mobile'
    location_verified INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS gym_settings (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    timezone       TEXT NOT NULL,
    barcode_prefix TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    full_name     TEXT NOT NULL,
    role          TEXT NOT NULL,   -- 'student' | 'guardian'
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS announcements (
    announcement_id TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    audience        TEXT,
    created_at      TEXT NOT NULL,
    sent_at         TEXT
);

CREATE INDEX IF NOT EXISTS attendance_student_idx ON attendance(student_id);
CREATE INDEX IF NOT EXISTS attendance_scanned_idx ON attendance(scanned_at);
CREATE INDEX IF NOT EXISTS schedules_day_idx      ON class_schedules(day_of_week);
CREATE INDEX IF NOT EXISTS access_account_idx     ON student_access(account_id);

PRAGMA user_version = 1;
";
