//! Error types for `habitual-core`.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::habit::{HabitId, Periodicity};

#[derive(Debug, Error)]
pub enum Error {
  #[error("habit not found: {0}")]
  HabitNotFound(HabitId),

  #[error("habit {habit_id} has already been checked off in the current {periodicity} period")]
  AlreadyCompletedInPeriod {
    habit_id:    HabitId,
    periodicity: Periodicity,
  },

  #[error("unknown periodicity {0:?}; expected \"daily\" or \"weekly\"")]
  InvalidPeriodicity(String),

  /// The checkoff lies before the point the elapsed periods are counted
  /// from; the clock went backwards, or the habit has not started yet.
  #[error("checkoff at {checkoff} is before the reference point {reference}")]
  CheckoffBeforeReference {
    reference: NaiveDateTime,
    checkoff:  NaiveDateTime,
  },

  #[error("invalid validity window: {from} is after {to}")]
  InvalidWindow { from: NaiveDate, to: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
