//! Habit types: the recurring activities being tracked.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Storage-assigned habit identifier.
pub type HabitId = i64;

// ─── Periodicity ─────────────────────────────────────────────────────────────

/// The cadence a habit must be completed within.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Periodicity {
  Daily,
  Weekly,
}

impl Periodicity {
  /// Normalise a user-supplied periodicity string. Surrounding whitespace and
  /// letter case are ignored.
  pub fn parse(raw: &str) -> Result<Self> {
    raw
      .trim()
      .parse()
      .map_err(|_| Error::InvalidPeriodicity(raw.to_owned()))
  }

  pub fn days_per_period(self) -> i64 {
    match self {
      Self::Daily => 1,
      Self::Weekly => 7,
    }
  }

  /// The span covered by `count` consecutive periods.
  pub fn span(self, count: i64) -> Duration {
    Duration::days(count * self.days_per_period())
  }

  /// Whole periods contained in `elapsed_days`, truncated toward zero.
  pub fn periods_in(self, elapsed_days: i64) -> i64 {
    elapsed_days / self.days_per_period()
  }
}

// ─── Habit ───────────────────────────────────────────────────────────────────

/// A persisted habit. History entries live in their own table and are
/// attached on read (see [`crate::history::TrackedHabit`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
  pub id:            HabitId,
  pub name:          String,
  /// Free-text description of what completing the habit means.
  pub specification: String,
  /// Set by the store on creation; never changes afterwards.
  pub created_at:    NaiveDateTime,
  pub periodicity:   Periodicity,
  /// First day of the validity window.
  pub period_from:   NaiveDate,
  /// Last day of the validity window.
  pub period_to:     NaiveDate,
}

impl Habit {
  /// Midnight of the first day of the validity window; the reference point
  /// for a habit that has never been completed.
  pub fn starts_at(&self) -> NaiveDateTime {
    self.period_from.and_time(NaiveTime::MIN)
  }

  /// Return a copy of this habit with `patch` applied. Fails without
  /// modifying anything if the patched window would be inverted.
  pub fn patched(&self, patch: HabitPatch) -> Result<Self> {
    let mut next = self.clone();
    if let Some(name) = patch.name {
      next.name = name;
    }
    if let Some(specification) = patch.specification {
      next.specification = specification;
    }
    if let Some(periodicity) = patch.periodicity {
      next.periodicity = periodicity;
    }
    if let Some(from) = patch.period_from {
      next.period_from = from;
    }
    if let Some(to) = patch.period_to {
      next.period_to = to;
    }
    check_window(next.period_from, next.period_to)?;
    Ok(next)
  }
}

fn check_window(from: NaiveDate, to: NaiveDate) -> Result<()> {
  if from > to {
    return Err(Error::InvalidWindow { from, to });
  }
  Ok(())
}

// ─── NewHabit ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::HabitStore::create_habit`]. The id and creation
/// timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewHabit {
  pub name:          String,
  pub specification: String,
  pub periodicity:   Periodicity,
  pub period_from:   NaiveDate,
  pub period_to:     NaiveDate,
}

impl NewHabit {
  pub fn new(
    name: impl Into<String>,
    specification: impl Into<String>,
    periodicity: Periodicity,
    period_from: NaiveDate,
    period_to: NaiveDate,
  ) -> Self {
    Self {
      name: name.into(),
      specification: specification.into(),
      periodicity,
      period_from,
      period_to,
    }
  }

  pub fn validate(&self) -> Result<()> {
    check_window(self.period_from, self.period_to)
  }
}

// ─── HabitPatch ──────────────────────────────────────────────────────────────

/// A partial update: only `Some` fields overwrite the stored value.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
  pub name:          Option<String>,
  pub specification: Option<String>,
  pub periodicity:   Option<Periodicity>,
  pub period_from:   Option<NaiveDate>,
  pub period_to:     Option<NaiveDate>,
}

impl HabitPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.specification.is_none()
      && self.periodicity.is_none()
      && self.period_from.is_none()
      && self.period_to.is_none()
  }
}
