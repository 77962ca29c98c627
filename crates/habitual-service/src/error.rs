//! Service error type and its presentation-level classification.

use habitual_core::habit::HabitId;
use serde::Serialize;
use thiserror::Error;

/// An error returned by a service operation.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] habitual_core::Error),

  /// Another completion kept landing between planning and writing.
  #[error("habit {0} changed while it was being completed")]
  Conflict(HabitId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn kind(&self) -> ErrorKind {
    use habitual_core::Error as Core;

    match self {
      Self::Core(Core::HabitNotFound(_)) => ErrorKind::HabitNotFound,
      Self::Core(Core::AlreadyCompletedInPeriod { .. }) => {
        ErrorKind::AlreadyCompletedInPeriod
      }
      Self::Core(Core::InvalidPeriodicity(_)) => ErrorKind::InvalidPeriodicity,
      Self::Core(Core::CheckoffBeforeReference { .. }) => {
        ErrorKind::CheckoffBeforeReference
      }
      Self::Core(Core::InvalidWindow { .. }) => ErrorKind::InvalidWindow,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::Store(_) => ErrorKind::Store,
    }
  }
}

/// Coarse classification used by front ends to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  HabitNotFound,
  AlreadyCompletedInPeriod,
  InvalidPeriodicity,
  CheckoffBeforeReference,
  InvalidWindow,
  Conflict,
  Store,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
