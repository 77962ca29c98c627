//! Longest run streak queries.

use habitual_core::{
  habit::{HabitId, Periodicity},
  store::HabitStore,
  streak::{longest_run, longest_run_across, longest_run_of},
};

use crate::{Error, Result, habits};

/// Which habits a streak query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakScope {
  All,
  Periodicity(Periodicity),
  Habit(HabitId),
}

/// The longest run of consecutive completed periods within `scope`. Zero
/// when the scope holds no habits or no completions.
pub async fn longest_streak<S>(store: &S, scope: StreakScope) -> Result<usize>
where
  S: HabitStore,
{
  let longest = match scope {
    StreakScope::Habit(id) => {
      habits::find(store, id).await?;
      let history = store.list_history(id).await.map_err(Error::store)?;
      longest_run_of(&history)
    }
    StreakScope::All => across(store, None).await?,
    StreakScope::Periodicity(p) => across(store, Some(p)).await?,
  };

  tracing::debug!(?scope, longest, "computed longest streak");
  Ok(longest)
}

async fn across<S>(store: &S, periodicity: Option<Periodicity>) -> Result<usize>
where
  S: HabitStore,
{
  let tracked = habits::list(store, periodicity).await?;
  Ok(longest_run_across(
    tracked.iter().map(|t| longest_run(t.completion_flags())),
  ))
}
