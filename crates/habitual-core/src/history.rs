//! History entries and the tracked-habit read model.
//!
//! History is an append-only log: rows are written by the completion
//! reconciler and removed only when their habit is deleted. A habit's
//! streak is computed from its history at query time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::habit::{Habit, HabitId};

/// Storage-assigned history identifier. Ids increase in insertion order.
pub type HistoryId = i64;

/// One check-off record: either a real completion or a broken (missed)
/// period backfilled when the habit was next completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
  pub id:             HistoryId,
  pub habit_id:       HabitId,
  pub checked_off_at: NaiveDateTime,
  pub completed:      bool,
}

/// A history row waiting to be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHistory {
  pub checked_off_at: NaiveDateTime,
  pub completed:      bool,
}

impl NewHistory {
  pub fn completed(at: NaiveDateTime) -> Self {
    Self { checked_off_at: at, completed: true }
  }

  pub fn broken(at: NaiveDateTime) -> Self {
    Self { checked_off_at: at, completed: false }
  }
}

/// A habit bundled with its history in ascending checkoff order, never
/// stored, always assembled on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedHabit {
  pub habit:   Habit,
  pub history: Vec<History>,
}

impl TrackedHabit {
  pub fn completion_flags(&self) -> impl Iterator<Item = bool> + '_ {
    self.history.iter().map(|h| h.completed)
  }
}
