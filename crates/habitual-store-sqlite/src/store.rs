//! [`SqliteStore`]: the SQLite implementation of [`HabitStore`].

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::OptionalExtension as _;

use habitual_core::{
  habit::{Habit, HabitId, NewHabit, Periodicity},
  history::{History, HistoryId, NewHistory},
  store::{Appended, HabitStore},
};

use crate::{
  Error, Result,
  encode::{
    HABIT_COLUMNS, HISTORY_COLUMNS, RawHabit, RawHistory, encode_date, encode_dt,
    encode_periodicity,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A habit store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    tracing::debug!(path = %path.display(), "opening habit store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Last completed row id of a habit; shared by the read path and the append
/// guard so both agree on what "last" means.
const LAST_COMPLETION_FILTER: &str =
  "WHERE habit_id = ?1 AND completed = 1
   ORDER BY checked_off_at DESC, history_id DESC
   LIMIT 1";

// ─── HabitStore impl ─────────────────────────────────────────────────────────

impl HabitStore for SqliteStore {
  type Error = Error;

  // ── Habits ────────────────────────────────────────────────────────────────

  async fn create_habit(
    &self,
    input:      NewHabit,
    created_at: NaiveDateTime,
  ) -> Result<Habit> {
    input.validate()?;

    let created_at_str  = encode_dt(created_at);
    let periodicity_str = encode_periodicity(input.periodicity);
    let from_str        = encode_date(input.period_from);
    let to_str          = encode_date(input.period_to);
    let NewHabit { name, specification, .. } = input;

    let raw: RawHabit = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO habits (
             name, specification, created_at, periodicity, period_from, period_to
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            name,
            specification,
            created_at_str,
            periodicity_str,
            from_str,
            to_str,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE habit_id = ?1"),
          rusqlite::params![id],
          RawHabit::from_row,
        )?)
      })
      .await?;

    let habit = raw.into_habit()?;
    tracing::info!(habit_id = habit.id, name = %habit.name, "habit created");
    Ok(habit)
  }

  async fn find_habit(&self, id: HabitId) -> Result<Option<Habit>> {
    let raw: Option<RawHabit> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE habit_id = ?1"),
            rusqlite::params![id],
            RawHabit::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHabit::into_habit).transpose()
  }

  async fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>> {
    let periodicity_str = periodicity.map(encode_periodicity);

    let raws: Vec<RawHabit> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(p) = periodicity_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE periodicity = ?1 ORDER BY habit_id"
          ))?;
          stmt
            .query_map(rusqlite::params![p], RawHabit::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY habit_id"
          ))?;
          stmt
            .query_map([], RawHabit::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHabit::into_habit).collect()
  }

  async fn update_habit(&self, habit: Habit) -> Result<bool> {
    let Habit { id, name, specification, periodicity, period_from, period_to, .. } =
      habit;
    let periodicity_str = encode_periodicity(periodicity);
    let from_str        = encode_date(period_from);
    let to_str          = encode_date(period_to);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE habits
             SET name = ?2, specification = ?3, periodicity = ?4,
                 period_from = ?5, period_to = ?6
           WHERE habit_id = ?1",
          rusqlite::params![id, name, specification, periodicity_str, from_str, to_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_habit(&self, id: HabitId) -> Result<bool> {
    let (histories, habits) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let histories = tx.execute(
          "DELETE FROM histories WHERE habit_id = ?1",
          rusqlite::params![id],
        )?;
        let habits = tx.execute(
          "DELETE FROM habits WHERE habit_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok((histories, habits))
      })
      .await?;

    if habits > 0 {
      tracing::info!(habit_id = id, histories, "habit deleted");
    }
    Ok(habits > 0)
  }

  // ── History ───────────────────────────────────────────────────────────────

  async fn find_last_completion(&self, habit_id: HabitId) -> Result<Option<History>> {
    let raw: Option<RawHistory> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {HISTORY_COLUMNS} FROM histories {LAST_COMPLETION_FILTER}"),
            rusqlite::params![habit_id],
            RawHistory::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHistory::into_history).transpose()
  }

  async fn append_history(
    &self,
    habit_id:                 HabitId,
    expected_last_completion: Option<HistoryId>,
    rows:                     Vec<NewHistory>,
  ) -> Result<Appended> {
    let encoded: Vec<(String, bool)> = rows
      .iter()
      .map(|r| (encode_dt(r.checked_off_at), r.completed))
      .collect();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM habits WHERE habit_id = ?1",
            rusqlite::params![habit_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(Appended::MissingHabit);
        }

        let last: Option<HistoryId> = tx
          .query_row(
            &format!("SELECT history_id FROM histories {LAST_COMPLETION_FILTER}"),
            rusqlite::params![habit_id],
            |r| r.get(0),
          )
          .optional()?;
        if last != expected_last_completion {
          return Ok(Appended::Stale);
        }

        let mut ids = Vec::with_capacity(encoded.len());
        {
          let mut stmt = tx.prepare(
            "INSERT INTO histories (habit_id, checked_off_at, completed)
             VALUES (?1, ?2, ?3)",
          )?;
          for (at, completed) in &encoded {
            ids.push(stmt.insert(rusqlite::params![habit_id, at, completed])?);
          }
        }
        tx.commit()?;
        Ok(Appended::Inserted(ids))
      })
      .await?;

    match &outcome {
      Appended::Inserted(ids) => {
        tracing::debug!(habit_id, rows = ids.len(), "history appended");
      }
      Appended::Stale => {
        tracing::warn!(
          habit_id,
          ?expected_last_completion,
          "last completion changed since planning; nothing appended"
        );
      }
      Appended::MissingHabit => {
        tracing::warn!(habit_id, "habit vanished before its history was appended");
      }
    }
    Ok(outcome)
  }

  async fn list_history(&self, habit_id: HabitId) -> Result<Vec<History>> {
    let raws: Vec<RawHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HISTORY_COLUMNS} FROM histories
           WHERE habit_id = ?1
           ORDER BY checked_off_at ASC, history_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![habit_id], RawHistory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistory::into_history).collect()
  }
}
