//! The `HabitStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `habitual-store-sqlite`).
//! Higher layers (`habitual-service`, `habitual-cli`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDateTime;

use crate::{
  habit::{Habit, HabitId, NewHabit, Periodicity},
  history::{History, HistoryId, NewHistory},
};

/// Outcome of [`HabitStore::append_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appended {
  /// New row ids, in insertion order.
  Inserted(Vec<HistoryId>),
  /// The last completion changed since the rows were planned.
  Stale,
  /// The habit is gone.
  MissingHabit,
}

impl Appended {
  /// The new ids, if anything was written.
  pub fn inserted(self) -> Option<Vec<HistoryId>> {
    match self {
      Self::Inserted(ids) => Some(ids),
      Self::Stale | Self::MissingHabit => None,
    }
  }
}

/// Abstraction over a habit store backend.
///
/// History is append-only: the only way rows leave the store is by deleting
/// their habit.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait HabitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Habits ────────────────────────────────────────────────────────────

  /// Persist a new habit; the store assigns its id.
  fn create_habit(
    &self,
    input: NewHabit,
    created_at: NaiveDateTime,
  ) -> impl Future<Output = Result<Habit, Self::Error>> + Send + '_;

  /// Retrieve a habit by id. Returns `None` if not found.
  fn find_habit(
    &self,
    id: HabitId,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// List all habits in id order, optionally filtered by periodicity.
  fn list_habits(
    &self,
    periodicity: Option<Periodicity>,
  ) -> impl Future<Output = Result<Vec<Habit>, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing habit. `id` and
  /// `created_at` are never written. Returns `false` if the id is unknown.
  fn update_habit(
    &self,
    habit: Habit,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a habit together with its whole history, atomically. Returns
  /// `false` if the id is unknown.
  fn delete_habit(
    &self,
    id: HabitId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── History ───────────────────────────────────────────────────────────

  /// The most recent completed row of a habit (latest checkoff, highest id
  /// among equal checkoffs). Broken rows are ignored.
  fn find_last_completion(
    &self,
    habit_id: HabitId,
  ) -> impl Future<Output = Result<Option<History>, Self::Error>> + Send + '_;

  /// Append `rows` in order within a single transaction.
  ///
  /// The write only happens if the habit still exists and its last
  /// completion is still `expected_last_completion`; otherwise nothing is
  /// written and the outcome says why.
  fn append_history(
    &self,
    habit_id: HabitId,
    expected_last_completion: Option<HistoryId>,
    rows: Vec<NewHistory>,
  ) -> impl Future<Output = Result<Appended, Self::Error>> + Send + '_;

  /// All rows of a habit in ascending checkoff order (ties by id).
  fn list_history(
    &self,
    habit_id: HabitId,
  ) -> impl Future<Output = Result<Vec<History>, Self::Error>> + Send + '_;
}
