//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Record factories for sessions, exercises and sets
//! - Fixed-date helpers

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::models::{Exercise, Session, SetEntry};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id(prefix: &str) -> String {
  format!("{}-{}", prefix, NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database with migrations applied
///
/// Uses max_connections(1) so every query sees the same in-memory database
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  db::run_migrations(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert `count` weekly squat sessions ending `ends` and return them oldest first
pub async fn seed_test_sessions(pool: &SqlitePool, count: usize, ends: DateTime<Utc>) -> Vec<Session> {
  let mut sessions = Vec::new();

  for i in (0..count).rev() {
    let started_at = ends - Duration::weeks(i as i64);
    let session = mock_session(
      started_at,
      vec![mock_exercise(
        "Back Squat",
        vec![lifting_set(100.0 + i as f64, 5), rated_set(90.0, 8, 7.5)],
      )],
    );
    db::insert_session(pool, &session)
      .await
      .expect("Failed to insert test session");
    sessions.push(session);
  }

  sessions
}

/// ---------------------------------------------------------------------------
/// Record Factories
/// ---------------------------------------------------------------------------

pub fn mock_set(weight_kg: Option<f64>, reps: Option<i64>, rpe: Option<f64>) -> SetEntry {
  SetEntry {
    id: next_id("set"),
    set_number: 1,
    weight_kg,
    reps,
    rpe,
    is_logged: true,
  }
}

/// Weight and reps, no exertion recorded
pub fn lifting_set(weight_kg: f64, reps: i64) -> SetEntry {
  mock_set(Some(weight_kg), Some(reps), None)
}

pub fn rated_set(weight_kg: f64, reps: i64, rpe: f64) -> SetEntry {
  mock_set(Some(weight_kg), Some(reps), Some(rpe))
}

/// Exercise with sets numbered in the order given
pub fn mock_exercise(name: &str, sets: Vec<SetEntry>) -> Exercise {
  let sets = sets
    .into_iter()
    .enumerate()
    .map(|(i, mut set)| {
      set.set_number = i as i64 + 1;
      set
    })
    .collect();

  Exercise {
    id: next_id("exercise"),
    name: name.to_string(),
    position: 0,
    sets,
  }
}

/// Session with exercises positioned in the order given
pub fn mock_session(started_at: DateTime<Utc>, exercises: Vec<Exercise>) -> Session {
  let exercises = exercises
    .into_iter()
    .enumerate()
    .map(|(i, mut ex)| {
      ex.position = i as i64;
      ex
    })
    .collect();

  Session {
    id: next_id("workout"),
    name: "Strength".to_string(),
    started_at,
    completed_at: Some(started_at + Duration::minutes(60)),
    is_seed: false,
    exercises,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed UTC timestamp on the hour
pub fn datetime_at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
    .single()
    .expect("valid test date")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'exercises', 'sets')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_sessions_returns_correct_count() {
    let pool = setup_test_db().await;

    let sessions = seed_test_sessions(&pool, 5, datetime_at(2024, 3, 4, 18)).await;
    assert_eq!(sessions.len(), 5);
    assert!(sessions.windows(2).all(|w| w[0].started_at < w[1].started_at));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");
    assert_eq!(count, 5);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_factories_number_sets_and_positions() {
    let session = mock_session(
      datetime_at(2024, 3, 4, 18),
      vec![
        mock_exercise("Bench Press", vec![lifting_set(80.0, 5), lifting_set(80.0, 5)]),
        mock_exercise("Barbell Row", vec![lifting_set(70.0, 8)]),
      ],
    );

    assert_eq!(session.exercises[1].position, 1);
    let numbers: Vec<_> = session.exercises[0].sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_ne!(session.exercises[0].sets[0].id, session.exercises[0].sets[1].id);
  }
}
