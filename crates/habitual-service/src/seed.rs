//! Demo data for a fresh store.
//!
//! Seven habits, each with four history rows covering its four most recent
//! periods up to and including `now`.

use chrono::NaiveDateTime;
use habitual_core::{
  habit::{NewHabit, Periodicity},
  history::NewHistory,
  store::{Appended, HabitStore},
};
use serde::Serialize;

use crate::{Error, Result, whole_seconds};

struct SeedHabit {
  name:          &'static str,
  specification: &'static str,
  periodicity:   Periodicity,
  /// Length of the validity window, in periods, counted from the first row.
  window:        i64,
  /// Completion flags, oldest first, one per period.
  flags:         [bool; 4],
}

const SEED: [SeedHabit; 7] = [
  SeedHabit {
    name:          "work",
    specification: "work each day",
    periodicity:   Periodicity::Daily,
    window:        30,
    flags:         [true, true, false, true],
  },
  SeedHabit {
    name:          "walk",
    specification: "walk each day",
    periodicity:   Periodicity::Daily,
    window:        13,
    flags:         [true, true, true, true],
  },
  SeedHabit {
    name:          "book",
    specification: "read a book each week",
    periodicity:   Periodicity::Weekly,
    window:        13,
    flags:         [false, true, false, true],
  },
  SeedHabit {
    name:          "cycle",
    specification: "cycle each week",
    periodicity:   Periodicity::Weekly,
    window:        21,
    flags:         [false, false, true, true],
  },
  SeedHabit {
    name:          "swim",
    specification: "swim each week",
    periodicity:   Periodicity::Weekly,
    window:        4,
    flags:         [true, false, true, false],
  },
  SeedHabit {
    name:          "meditate",
    specification: "meditate each day",
    periodicity:   Periodicity::Daily,
    window:        13,
    flags:         [true, false, false, false],
  },
  SeedHabit {
    name:          "phone",
    specification: "call friends each day",
    periodicity:   Periodicity::Daily,
    window:        90,
    flags:         [true, true, true, false],
  },
];

/// Result of [`initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
  Seeded { habits: usize, histories: usize },
  /// The store already held habits; nothing was written.
  AlreadyPopulated,
}

/// The demo habits and their history rows, anchored so the newest row of
/// each habit falls on `now`.
pub fn fixtures(now: NaiveDateTime) -> Vec<(NewHabit, Vec<NewHistory>)> {
  SEED
    .iter()
    .map(|seed| {
      let p = seed.periodicity;
      let last = seed.flags.len() as i64 - 1;
      let first = now - p.span(last);

      let history = seed
        .flags
        .iter()
        .enumerate()
        .map(|(i, &completed)| NewHistory {
          checked_off_at: first + p.span(i as i64),
          completed,
        })
        .collect();

      let habit = NewHabit::new(
        seed.name,
        seed.specification,
        p,
        first.date(),
        (first + p.span(seed.window)).date(),
      );
      (habit, history)
    })
    .collect()
}

/// Populate `store` with the demo habits, unless it already holds any.
pub async fn initialize<S>(store: &S, now: NaiveDateTime) -> Result<SeedOutcome>
where
  S: HabitStore,
{
  let existing = store.list_habits(None).await.map_err(Error::store)?;
  if !existing.is_empty() {
    tracing::info!(habits = existing.len(), "store already populated; skipping seed");
    return Ok(SeedOutcome::AlreadyPopulated);
  }

  let now = whole_seconds(now);
  let mut habits = 0;
  let mut histories = 0;
  for (input, rows) in fixtures(now) {
    let habit = store.create_habit(input, now).await.map_err(Error::store)?;
    let row_count = rows.len();
    match store
      .append_history(habit.id, None, rows)
      .await
      .map_err(Error::store)?
    {
      Appended::Inserted(_) => {}
      Appended::Stale => return Err(Error::Conflict(habit.id)),
      Appended::MissingHabit => {
        return Err(habitual_core::Error::HabitNotFound(habit.id).into());
      }
    }
    habits += 1;
    histories += row_count;
  }

  tracing::info!(habits, histories, "seeded demo habits");
  Ok(SeedOutcome::Seeded { habits, histories })
}
