//! Core types and trait definitions for the Habitual habit tracker.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! It holds the domain model, the [`store::HabitStore`] abstraction, and the
//! two pure computations everything else is built around: completion
//! reconciliation and streak analysis.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod habit;
pub mod history;
pub mod reconcile;
pub mod store;
pub mod streak;

pub use error::{Error, Result};
