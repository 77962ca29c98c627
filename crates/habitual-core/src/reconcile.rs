//! Completion reconciliation: deciding which history rows a check-off
//! produces.
//!
//! Completing a habit appends one completed row for `now`. Every whole period
//! that went by since the reference point without a completion is backfilled
//! with a broken row first, so the history stays a contiguous sequence of
//! periods and run streaks can be read straight off it.
//!
//! The reference point is the last completed check-off, or midnight of the
//! habit's first day when it has never been completed. Elapsed periods are
//! counted in whole 24-hour days (truncated), divided by seven for weekly
//! habits. No calendar or ISO-week arithmetic is involved.

use chrono::NaiveDateTime;

use crate::{
  Error, Result,
  habit::{Habit, HabitId},
  history::{History, HistoryId, NewHistory},
};

/// The rows a completion will append, computed before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPlan {
  pub habit_id:        HabitId,
  /// Where elapsed periods were counted from.
  pub reference:       NaiveDateTime,
  /// The completed row the plan was built on, if any. Writers use it to
  /// detect that another completion slipped in after planning.
  pub last_completion: Option<HistoryId>,
  pub elapsed_periods: i64,
  /// Broken rows in chronological order, followed by the completion.
  pub rows:            Vec<NewHistory>,
}

impl CompletionPlan {
  pub fn had_prior_completion(&self) -> bool { self.last_completion.is_some() }

  pub fn broken_count(&self) -> usize { self.rows.len() - 1 }

  /// The completed row; always the last one.
  pub fn completion(&self) -> &NewHistory {
    &self.rows[self.rows.len() - 1]
  }
}

/// Plan the completion of `habit` at `now`, given its most recent completed
/// history row.
///
/// Fails with [`Error::AlreadyCompletedInPeriod`] when the habit was already
/// completed less than one period ago, and with
/// [`Error::CheckoffBeforeReference`] when `now` precedes the reference
/// point.
pub fn plan_completion(
  habit: &Habit,
  last_completion: Option<&History>,
  now: NaiveDateTime,
) -> Result<CompletionPlan> {
  let reference = match last_completion {
    Some(last) => last.checked_off_at,
    None => habit.starts_at(),
  };
  let had_prior = last_completion.is_some();

  if now < reference {
    return Err(Error::CheckoffBeforeReference { reference, checkoff: now });
  }

  let periodicity = habit.periodicity;
  let elapsed = periodicity.periods_in((now - reference).num_days());

  if had_prior && elapsed < 1 {
    return Err(Error::AlreadyCompletedInPeriod {
      habit_id: habit.id,
      periodicity,
    });
  }

  // Without a prior completion the reference period itself was never
  // completed, so backfilling starts at index 0 rather than 1.
  let missed = elapsed - 1;
  let first = if had_prior { 1 } else { 0 };

  let mut rows: Vec<NewHistory> = (first..=missed)
    .map(|index| NewHistory::broken(reference + periodicity.span(index)))
    .collect();
  rows.push(NewHistory::completed(now));

  Ok(CompletionPlan {
    habit_id: habit.id,
    reference,
    last_completion: last_completion.map(|h| h.id),
    elapsed_periods: elapsed,
    rows,
  })
}
