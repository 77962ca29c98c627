//! SQL schema for the Habitual SQLite store.
//!
//! Executed at every connection startup.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS habits (
    habit_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    specification TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL,   -- 'YYYY-MM-DD HH:MM:SS', local time
    periodicity   TEXT NOT NULL CHECK (periodicity IN ('daily', 'weekly')),
    period_from   TEXT NOT NULL,   -- 'YYYY-MM-DD'
    period_to     TEXT NOT NULL,   -- 'YYYY-MM-DD'
    CHECK (period_from <= period_to)
);

-- History is append-only; rows disappear only with their habit.
CREATE TABLE IF NOT EXISTS histories (
    history_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id       INTEGER NOT NULL REFERENCES habits(habit_id) ON DELETE CASCADE,
    checked_off_at TEXT NOT NULL,  -- 'YYYY-MM-DD HH:MM:SS', local time
    completed      INTEGER NOT NULL CHECK (completed IN (0, 1))
);

CREATE INDEX IF NOT EXISTS histories_habit_checkoff_idx
    ON histories(habit_id, checked_off_at);
";
