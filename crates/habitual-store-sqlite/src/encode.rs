//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as `YYYY-MM-DD HH:MM:SS` and dates as `YYYY-MM-DD`,
//! both of which sort lexicographically in chronological order. Periodicity
//! is stored as its lowercase name.

use chrono::{NaiveDate, NaiveDateTime};
use habitual_core::{
  habit::{Habit, HabitId, Periodicity},
  history::{History, HistoryId},
};

use crate::{Error, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String {
  dt.format(DATETIME_FORMAT).to_string()
}

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Periodicity ─────────────────────────────────────────────────────────────

pub fn encode_periodicity(p: Periodicity) -> &'static str {
  match p {
    Periodicity::Daily => "daily",
    Periodicity::Weekly => "weekly",
  }
}

pub fn decode_periodicity(s: &str) -> Result<Periodicity> {
  Ok(Periodicity::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawHabit::from_row`].
pub const HABIT_COLUMNS: &str =
  "habit_id, name, specification, created_at, periodicity, period_from, period_to";

/// Column list matching [`RawHistory::from_row`].
pub const HISTORY_COLUMNS: &str =
  "history_id, habit_id, checked_off_at, completed";

/// Raw values read directly from a `habits` row.
pub struct RawHabit {
  pub id:            HabitId,
  pub name:          String,
  pub specification: String,
  pub created_at:    String,
  pub periodicity:   String,
  pub period_from:   String,
  pub period_to:     String,
}

impl RawHabit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      specification: row.get(2)?,
      created_at:    row.get(3)?,
      periodicity:   row.get(4)?,
      period_from:   row.get(5)?,
      period_to:     row.get(6)?,
    })
  }

  pub fn into_habit(self) -> Result<Habit> {
    Ok(Habit {
      id:            self.id,
      name:          self.name,
      specification: self.specification,
      created_at:    decode_dt(&self.created_at)?,
      periodicity:   decode_periodicity(&self.periodicity)?,
      period_from:   decode_date(&self.period_from)?,
      period_to:     decode_date(&self.period_to)?,
    })
  }
}

/// Raw values read directly from a `histories` row.
pub struct RawHistory {
  pub id:             HistoryId,
  pub habit_id:       HabitId,
  pub checked_off_at: String,
  pub completed:      bool,
}

impl RawHistory {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      habit_id:       row.get(1)?,
      checked_off_at: row.get(2)?,
      completed:      row.get(3)?,
    })
  }

  pub fn into_history(self) -> Result<History> {
    Ok(History {
      id:             self.id,
      habit_id:       self.habit_id,
      checked_off_at: decode_dt(&self.checked_off_at)?,
      completed:      self.completed,
    })
  }
}
