//! Checking off a habit.
//!
//! The last completion is read, a [`CompletionPlan`] is computed, and the
//! planned rows are appended in one transaction that only commits if the
//! last completion is still the one the plan was built on. A plan that went
//! stale is discarded and rebuilt, so two overlapping completions of the
//! same habit can never both land in one period.

use chrono::NaiveDateTime;
use habitual_core::{
  habit::HabitId,
  history::HistoryId,
  reconcile::{CompletionPlan, plan_completion},
  store::{Appended, HabitStore},
};
use serde::Serialize;

use crate::{Error, Result, habits, whole_seconds};

pub(crate) const MAX_ATTEMPTS: usize = 3;

/// What a successful completion wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completed {
  pub habit_id:       HabitId,
  /// Id of the completed row, always the last one written.
  pub completion_id:  HistoryId,
  /// Ids of the backfilled broken rows, oldest first.
  pub broken_ids:     Vec<HistoryId>,
  pub checked_off_at: NaiveDateTime,
}

/// Mark habit `id` completed at `now`, backfilling any missed periods.
pub async fn complete<S>(store: &S, id: HabitId, now: NaiveDateTime) -> Result<Completed>
where
  S: HabitStore,
{
  let now = whole_seconds(now);
  let habit = habits::find(store, id).await?;

  for attempt in 1..=MAX_ATTEMPTS {
    let last = store.find_last_completion(id).await.map_err(Error::store)?;
    let plan: CompletionPlan = match plan_completion(&habit, last.as_ref(), now) {
      Ok(plan) => plan,
      Err(e) => {
        tracing::warn!(habit_id = id, error = %e, "completion rejected");
        return Err(e.into());
      }
    };

    let appended = store
      .append_history(id, plan.last_completion, plan.rows.clone())
      .await
      .map_err(Error::store)?;

    let ids = match appended {
      Appended::Inserted(ids) => ids,
      Appended::Stale => {
        tracing::debug!(habit_id = id, attempt, "completion plan went stale; replanning");
        continue;
      }
      Appended::MissingHabit => {
        tracing::warn!(habit_id = id, "habit deleted while being completed");
        return Err(habitual_core::Error::HabitNotFound(id).into());
      }
    };

    let Some((&completion_id, broken_ids)) = ids.split_last() else {
      return Err(Error::Store("store reported no appended rows".into()));
    };

    tracing::info!(
      habit_id = id,
      completion_id,
      broken = broken_ids.len(),
      elapsed_periods = plan.elapsed_periods,
      "habit completed"
    );
    return Ok(Completed {
      habit_id: id,
      completion_id,
      broken_ids: broken_ids.to_vec(),
      checked_off_at: now,
    });
  }

  tracing::warn!(habit_id = id, attempts = MAX_ATTEMPTS, "giving up on completion");
  Err(Error::Conflict(id))
}
