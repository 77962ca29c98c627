//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveDateTime};
use habitual_core::{
  habit::{NewHabit, Periodicity},
  history::NewHistory,
  store::{Appended, HabitStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, d).unwrap() }

fn at(d: u32, h: u32) -> NaiveDateTime { date(d).and_hms_opt(h, 0, 0).unwrap() }

fn new_habit(name: &str, periodicity: Periodicity) -> NewHabit {
  NewHabit::new(name, format!("{name} regularly"), periodicity, date(1), date(31))
}

// ─── Habits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_habit() {
  let s = store().await;

  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();
  assert!(habit.id > 0);
  assert_eq!(habit.name, "walk");
  assert_eq!(habit.created_at, at(1, 9));

  let fetched = s.find_habit(habit.id).await.unwrap().unwrap();
  assert_eq!(fetched, habit);
}

#[tokio::test]
async fn find_missing_habit_returns_none() {
  let s = store().await;
  assert!(s.find_habit(42).await.unwrap().is_none());
}

#[tokio::test]
async fn create_rejects_inverted_window() {
  let s = store().await;
  let mut input = new_habit("walk", Periodicity::Daily);
  input.period_to = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

  let err = s.create_habit(input, at(1, 9)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(habitual_core::Error::InvalidWindow { .. })
  ));
  assert!(s.list_habits(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_habits_all_and_by_periodicity() {
  let s = store().await;
  s.create_habit(new_habit("walk", Periodicity::Daily), at(1, 9)).await.unwrap();
  s.create_habit(new_habit("swim", Periodicity::Weekly), at(1, 9)).await.unwrap();
  s.create_habit(new_habit("read", Periodicity::Daily), at(1, 9)).await.unwrap();

  let all = s.list_habits(None).await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.windows(2).all(|w| w[0].id < w[1].id));

  let daily = s.list_habits(Some(Periodicity::Daily)).await.unwrap();
  assert_eq!(daily.len(), 2);
  assert!(daily.iter().all(|h| h.periodicity == Periodicity::Daily));

  let weekly = s.list_habits(Some(Periodicity::Weekly)).await.unwrap();
  assert_eq!(weekly.len(), 1);
  assert_eq!(weekly[0].name, "swim");
}

#[tokio::test]
async fn update_habit_keeps_id_and_creation() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();

  let mut changed = habit.clone();
  changed.name = "stroll".into();
  changed.periodicity = Periodicity::Weekly;
  changed.period_from = date(2);
  changed.period_to = date(20);
  changed.created_at = at(5, 5);
  assert!(s.update_habit(changed).await.unwrap());

  let fetched = s.find_habit(habit.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "stroll");
  assert_eq!(fetched.periodicity, Periodicity::Weekly);
  assert_eq!(fetched.period_from, date(2));
  assert_eq!(fetched.period_to, date(20));
  assert_eq!(fetched.created_at, habit.created_at);
}

#[tokio::test]
async fn update_missing_habit_reports_false() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();
  let mut ghost = habit.clone();
  ghost.id = habit.id + 100;
  assert!(!s.update_habit(ghost).await.unwrap());
}

#[tokio::test]
async fn delete_habit_cascades_history() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();
  let keep = s
    .create_habit(new_habit("read", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();

  s.append_history(habit.id, None, vec![
    NewHistory::broken(at(1, 0)),
    NewHistory::completed(at(2, 8)),
  ])
  .await
  .unwrap()
  .inserted()
  .unwrap();
  s.append_history(keep.id, None, vec![NewHistory::completed(at(1, 8))])
    .await
    .unwrap()
    .inserted()
    .unwrap();

  assert!(s.delete_habit(habit.id).await.unwrap());
  assert!(s.find_habit(habit.id).await.unwrap().is_none());
  assert!(s.list_history(habit.id).await.unwrap().is_empty());
  assert_eq!(s.list_history(keep.id).await.unwrap().len(), 1);

  assert!(!s.delete_habit(habit.id).await.unwrap());
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_returns_ids_in_insertion_order() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();

  let ids = s
    .append_history(habit.id, None, vec![
      NewHistory::broken(at(1, 0)),
      NewHistory::broken(at(2, 0)),
      NewHistory::completed(at(3, 7)),
    ])
    .await
    .unwrap()
    .inserted()
    .unwrap();
  assert_eq!(ids.len(), 3);
  assert!(ids.windows(2).all(|w| w[0] < w[1]));

  let history = s.list_history(habit.id).await.unwrap();
  let flags: Vec<bool> = history.iter().map(|h| h.completed).collect();
  assert_eq!(flags, [false, false, true]);
  assert_eq!(history.iter().map(|h| h.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn list_history_orders_by_checkoff_not_insertion() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();

  s.append_history(habit.id, None, vec![NewHistory::broken(at(5, 0))])
    .await
    .unwrap()
    .inserted()
    .unwrap();
  s.append_history(habit.id, None, vec![NewHistory::broken(at(2, 0))])
    .await
    .unwrap()
    .inserted()
    .unwrap();

  let history = s.list_history(habit.id).await.unwrap();
  assert_eq!(history[0].checked_off_at, at(2, 0));
  assert_eq!(history[1].checked_off_at, at(5, 0));
}

#[tokio::test]
async fn last_completion_ignores_broken_rows() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();
  assert!(s.find_last_completion(habit.id).await.unwrap().is_none());

  let ids = s
    .append_history(habit.id, None, vec![
      NewHistory::completed(at(1, 8)),
      NewHistory::broken(at(2, 8)),
      NewHistory::completed(at(3, 8)),
      NewHistory::broken(at(4, 8)),
    ])
    .await
    .unwrap()
    .inserted()
    .unwrap();

  let last = s.find_last_completion(habit.id).await.unwrap().unwrap();
  assert_eq!(last.id, ids[2]);
  assert_eq!(last.checked_off_at, at(3, 8));
  assert!(last.completed);
}

#[tokio::test]
async fn stale_guard_writes_nothing() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Daily), at(1, 9))
    .await
    .unwrap();
  let first = s
    .append_history(habit.id, None, vec![NewHistory::completed(at(1, 10))])
    .await
    .unwrap()
    .inserted()
    .unwrap();

  // Planned against "no completion yet", but one exists now.
  let outcome = s
    .append_history(habit.id, None, vec![
      NewHistory::broken(at(2, 0)),
      NewHistory::completed(at(3, 10)),
    ])
    .await
    .unwrap();
  assert_eq!(outcome, Appended::Stale);
  assert_eq!(s.list_history(habit.id).await.unwrap().len(), 1);

  let matched = s
    .append_history(habit.id, Some(first[0]), vec![NewHistory::completed(at(2, 10))])
    .await
    .unwrap();
  assert!(matches!(matched, Appended::Inserted(ids) if ids.len() == 1));
}

#[tokio::test]
async fn append_to_missing_habit_writes_nothing() {
  let s = store().await;
  let outcome = s
    .append_history(9, None, vec![NewHistory::completed(at(1, 8))])
    .await
    .unwrap();
  assert_eq!(outcome, Appended::MissingHabit);
  assert!(s.list_history(9).await.unwrap().is_empty());
}

#[tokio::test]
async fn timestamps_roundtrip_at_second_precision() {
  let s = store().await;
  let habit = s
    .create_habit(new_habit("walk", Periodicity::Weekly), at(1, 9))
    .await
    .unwrap();
  let when = date(4).and_hms_opt(23, 59, 58).unwrap();
  s.append_history(habit.id, None, vec![NewHistory::completed(when)])
    .await
    .unwrap()
    .inserted()
    .unwrap();

  let history = s.list_history(habit.id).await.unwrap();
  assert_eq!(history[0].checked_off_at, when);
  assert_eq!(history[0].habit_id, habit.id);
}
