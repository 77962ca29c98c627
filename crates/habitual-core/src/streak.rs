//! Run-streak analytics.

use crate::history::History;

/// Length of the longest unbroken run of `true` values, scanning `flags` in
/// the order given. Zero when there is no `true` at all.
pub fn longest_run<I>(flags: I) -> usize
where
  I: IntoIterator<Item = bool>,
{
  let mut longest = 0;
  let mut current = 0;
  for completed in flags {
    if completed {
      current += 1;
      longest = longest.max(current);
    } else {
      current = 0;
    }
  }
  longest
}

/// Longest run over one habit's history. `history` must already be in
/// ascending checkoff order, as [`crate::store::HabitStore::list_history`]
/// returns it.
pub fn longest_run_of(history: &[History]) -> usize {
  longest_run(history.iter().map(|h| h.completed))
}

/// The best of several per-habit runs; zero for an empty set.
pub fn longest_run_across<I>(runs: I) -> usize
where
  I: IntoIterator<Item = usize>,
{
  runs.into_iter().max().unwrap_or(0)
}
