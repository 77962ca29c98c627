//! Printing command results, as plain text or JSON.

use std::io::{self, Write as _};

use habitual_core::{
  Error as CoreError,
  habit::{Habit, HabitId, Periodicity},
  history::TrackedHabit,
};
use habitual_service::{
  Error, completion::Completed, seed::SeedOutcome, streaks::StreakScope,
};
use serde_json::{Value, json};

/// What a successful command produced.
#[derive(Debug)]
pub enum Report {
  Seeded(SeedOutcome),
  Created(Habit),
  Deleted(HabitId),
  Modified(Habit),
  Completed(Completed),
  Habits {
    tracked:     Vec<TrackedHabit>,
    periodicity: Option<Periodicity>,
  },
  Streak {
    scope:   StreakScope,
    longest: usize,
  },
}

pub struct Output {
  json: bool,
}

impl Output {
  pub fn new(json: bool) -> Self { Self { json } }

  pub fn report(&self, report: &Report) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if self.json {
      writeln!(stdout, "{}", serde_json::to_string_pretty(&report_json(report)?)?)?;
    } else {
      write!(stdout, "{}", report_text(report))?;
    }
    Ok(())
  }

  /// Report a failed habit operation. Text goes to stderr; JSON goes to
  /// stdout so scripted callers see one document either way.
  pub fn failure(&self, error: &Error) -> anyhow::Result<()> {
    tracing::debug!(?error, "command failed");
    if self.json {
      let body = json!({ "error": error.kind(), "message": error_message(error) });
      writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
      writeln!(io::stderr().lock(), "{}", error_message(error))?;
    }
    Ok(())
  }
}

// ─── Text ────────────────────────────────────────────────────────────────────

fn report_text(report: &Report) -> String {
  match report {
    Report::Seeded(SeedOutcome::Seeded { habits, histories }) => {
      format!("Database initialized with {habits} habits and {histories} history entries.\n")
    }
    Report::Seeded(SeedOutcome::AlreadyPopulated) => {
      "Database already holds habits; demo data not added.\n".to_string()
    }
    Report::Created(habit) => {
      format!("Habit '{}' created with ID '{}'.\n", habit.name, habit.id)
    }
    Report::Deleted(id) => format!("Habit with ID '{id}' deleted.\n"),
    Report::Modified(habit) => format!("Habit with ID '{}' modified.\n", habit.id),
    Report::Completed(done) => {
      let mut out = format!(
        "Habit with ID '{}' completed / checked-off at {}.\n",
        done.habit_id, done.checked_off_at
      );
      if !done.broken_ids.is_empty() {
        out.push_str(&format!(
          "Recorded {} missed period(s) as broken.\n",
          done.broken_ids.len()
        ));
      }
      out
    }
    Report::Habits {
      tracked,
      periodicity,
    } => habits_text(tracked, *periodicity),
    Report::Streak { scope, longest } => match scope {
      StreakScope::All => {
        format!("Showing longest run streak with a length of: {longest}\n")
      }
      StreakScope::Periodicity(p) => {
        format!("Showing longest {p} run streak with a length of: {longest}\n")
      }
      StreakScope::Habit(id) => format!(
        "Showing longest run streak for given habit with ID {id} with length of: {longest}\n"
      ),
    },
  }
}

fn habits_text(tracked: &[TrackedHabit], periodicity: Option<Periodicity>) -> String {
  let mut out = match periodicity {
    Some(p) => format!("Showing list of all defined {p} habits:\n"),
    None => "Showing list of all defined habits:\n".to_string(),
  };
  if tracked.is_empty() {
    out.push_str("No habits exist.\n");
    return out;
  }

  for t in tracked {
    let h = &t.habit;
    out.push_str(&format!(
      "[{}] {} ({}, {} to {}): {}\n",
      h.id, h.name, h.periodicity, h.period_from, h.period_to, h.specification
    ));
    for row in &t.history {
      let state = if row.completed { "completed" } else { "broken" };
      out.push_str(&format!("      {}  {state}\n", row.checked_off_at));
    }
  }
  out
}

fn error_message(error: &Error) -> String {
  match error {
    Error::Core(CoreError::HabitNotFound(id)) => {
      format!("Habit with ID '{id}' does not exist.")
    }
    Error::Core(CoreError::AlreadyCompletedInPeriod { habit_id, .. }) => {
      format!("Habit with ID '{habit_id}' has already been checked-off in given period.")
    }
    Error::Core(CoreError::InvalidPeriodicity(raw)) => {
      format!("Unknown period '{raw}'; use 'daily' or 'weekly'.")
    }
    Error::Core(CoreError::CheckoffBeforeReference {
      reference,
      checkoff,
    }) => format!(
      "Cannot check off at {checkoff}: that is before {reference}, where the current \
       period starts."
    ),
    Error::Core(CoreError::InvalidWindow { from, to }) => {
      format!("Habit end date {to} is before its start date {from}.")
    }
    Error::Conflict(id) => {
      format!("Habit with ID '{id}' was changed concurrently; try again.")
    }
    Error::Store(e) => format!("Storage error: {e}"),
  }
}

// ─── JSON ────────────────────────────────────────────────────────────────────

fn report_json(report: &Report) -> serde_json::Result<Value> {
  Ok(match report {
    Report::Seeded(outcome) => serde_json::to_value(outcome)?,
    Report::Created(habit) | Report::Modified(habit) => serde_json::to_value(habit)?,
    Report::Deleted(id) => json!({ "deleted": id }),
    Report::Completed(done) => serde_json::to_value(done)?,
    Report::Habits { tracked, .. } => serde_json::to_value(tracked)?,
    Report::Streak { scope, longest } => match scope {
      StreakScope::All => json!({ "scope": "all", "longest": longest }),
      StreakScope::Periodicity(p) => {
        json!({ "scope": "periodicity", "periodicity": p, "longest": longest })
      }
      StreakScope::Habit(id) => {
        json!({ "scope": "habit", "habit_id": id, "longest": longest })
      }
    },
  })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn messages_differ_per_kind() {
    let errors: Vec<Error> = vec![
      CoreError::HabitNotFound(4).into(),
      CoreError::AlreadyCompletedInPeriod {
        habit_id:    4,
        periodicity: Periodicity::Daily,
      }
      .into(),
      CoreError::InvalidPeriodicity("monthly".into()).into(),
      Error::Conflict(4),
    ];
    let messages: Vec<String> = errors.iter().map(error_message).collect();

    assert_eq!(messages[0], "Habit with ID '4' does not exist.");
    assert_eq!(
      messages[1],
      "Habit with ID '4' has already been checked-off in given period."
    );
    for (i, a) in messages.iter().enumerate() {
      for b in &messages[i + 1..] {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn empty_listing() {
    let text = habits_text(&[], Some(Periodicity::Weekly));
    assert_eq!(
      text,
      "Showing list of all defined weekly habits:\nNo habits exist.\n"
    );
  }

  #[test]
  fn streak_json_names_scope() {
    let value = report_json(&Report::Streak {
      scope:   StreakScope::Periodicity(Periodicity::Daily),
      longest: 4,
    })
    .unwrap();
    assert_eq!(
      value,
      json!({ "scope": "periodicity", "periodicity": "daily", "longest": 4 })
    );

    let value = report_json(&Report::Streak {
      scope:   StreakScope::Habit(7),
      longest: 2,
    })
    .unwrap();
    assert_eq!(value, json!({ "scope": "habit", "habit_id": 7, "longest": 2 }));
  }

  #[test]
  fn habit_listing_shows_history() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let tracked = TrackedHabit {
      habit:   Habit {
        id:            1,
        name:          "walk".into(),
        specification: "walk each day".into(),
        created_at:    day.and_hms_opt(9, 0, 0).unwrap(),
        periodicity:   Periodicity::Daily,
        period_from:   day,
        period_to:     day,
      },
      history: vec![habitual_core::history::History {
        id:             1,
        habit_id:       1,
        checked_off_at: day.and_hms_opt(10, 0, 0).unwrap(),
        completed:      true,
      }],
    };
    let text = habits_text(&[tracked], None);
    assert!(text.contains("[1] walk (daily, 2024-03-01 to 2024-03-01): walk each day"));
    assert!(text.contains("2024-03-01 10:00:00  completed"));
  }
}
