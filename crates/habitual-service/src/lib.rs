//! Habit service for Habitual.
//!
//! Orchestrates any [`habitual_core::store::HabitStore`] together with the
//! completion reconciler and the streak analyzer. Every operation takes the
//! store handle as an explicit argument; nothing here holds a connection.
//!
//! | Module         | Operations                                   |
//! |----------------|----------------------------------------------|
//! | [`habits`]     | create, modify, delete, get, list            |
//! | [`completion`] | complete (check off) a habit                 |
//! | [`streaks`]    | longest run streak by scope                  |
//! | [`seed`]       | populate an empty store with demo habits     |

pub mod completion;
pub mod error;
pub mod habits;
pub mod seed;
pub mod streaks;

use chrono::{Local, NaiveDateTime, Timelike as _};

pub use error::{Error, ErrorKind, Result};

/// The local wall clock, truncated to whole seconds (the precision the
/// store keeps).
pub fn local_now() -> NaiveDateTime { whole_seconds(Local::now().naive_local()) }

pub(crate) fn whole_seconds(at: NaiveDateTime) -> NaiveDateTime {
  at.with_nanosecond(0).unwrap_or(at)
}
