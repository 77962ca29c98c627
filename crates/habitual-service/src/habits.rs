//! Habit lifecycle operations: create, modify, delete, get, list.

use chrono::NaiveDateTime;
use habitual_core::{
  habit::{Habit, HabitId, HabitPatch, NewHabit, Periodicity},
  history::TrackedHabit,
  store::HabitStore,
};

use crate::{Error, Result, whole_seconds};

/// Load a habit or fail with [`habitual_core::Error::HabitNotFound`].
pub(crate) async fn find<S>(store: &S, id: HabitId) -> Result<Habit>
where
  S: HabitStore,
{
  store
    .find_habit(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| habitual_core::Error::HabitNotFound(id).into())
}

/// Create a habit stamped with `now` as its creation time.
pub async fn create<S>(store: &S, input: NewHabit, now: NaiveDateTime) -> Result<Habit>
where
  S: HabitStore,
{
  input.validate()?;
  store
    .create_habit(input, whole_seconds(now))
    .await
    .map_err(Error::store)
}

/// Apply a partial update. Fields left `None` in `patch` keep their stored
/// value; the id and creation time never change.
pub async fn modify<S>(store: &S, id: HabitId, patch: HabitPatch) -> Result<Habit>
where
  S: HabitStore,
{
  let current = find(store, id).await?;
  if patch.is_empty() {
    tracing::debug!(habit_id = id, "empty patch; nothing to modify");
    return Ok(current);
  }

  let next = current.patched(patch)?;
  let updated = store.update_habit(next.clone()).await.map_err(Error::store)?;
  if !updated {
    return Err(habitual_core::Error::HabitNotFound(id).into());
  }

  tracing::info!(habit_id = id, "habit modified");
  Ok(next)
}

/// Delete a habit and its whole history.
pub async fn delete<S>(store: &S, id: HabitId) -> Result<()>
where
  S: HabitStore,
{
  if !store.delete_habit(id).await.map_err(Error::store)? {
    return Err(habitual_core::Error::HabitNotFound(id).into());
  }
  Ok(())
}

/// One habit with its history in chronological order.
pub async fn get<S>(store: &S, id: HabitId) -> Result<TrackedHabit>
where
  S: HabitStore,
{
  let habit = find(store, id).await?;
  let history = store.list_history(id).await.map_err(Error::store)?;
  Ok(TrackedHabit { habit, history })
}

/// All habits, or only those of one periodicity, each with its history.
pub async fn list<S>(
  store: &S,
  periodicity: Option<Periodicity>,
) -> Result<Vec<TrackedHabit>>
where
  S: HabitStore,
{
  let habits = store.list_habits(periodicity).await.map_err(Error::store)?;
  tracing::debug!(count = habits.len(), ?periodicity, "listing habits");

  let mut tracked = Vec::with_capacity(habits.len());
  for habit in habits {
    let history = store.list_history(habit.id).await.map_err(Error::store)?;
    tracked.push(TrackedHabit { habit, history });
  }
  Ok(tracked)
}
