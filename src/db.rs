use std::collections::HashMap;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::models::workout::{ExerciseRow, SessionRow, SetRow};
use crate::models::{Exercise, Session, SetEntry};

pub type DbPool = SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open the connection pool and run migrations
pub async fn initialize_db(db_url: &str) -> Result<DbPool, StoreError> {
  tracing::info!(url = %db_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(db_url)
    .await?;

  run_migrations(&pool).await?;

  tracing::info!("Database initialized successfully");
  Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}

/// Load the full history, oldest session first, with exercises by position and sets by number.
/// Seed sessions are dropped unless `include_seed` is set.
pub async fn load_sessions(pool: &DbPool, include_seed: bool) -> Result<Vec<Session>, StoreError> {
  let rows: Vec<SessionRow> = sqlx::query_as(
    r#"
    SELECT id, name, started_at, completed_at, is_seed
    FROM workouts
    WHERE ?1 OR is_seed = 0
    ORDER BY started_at ASC, id ASC
    "#,
  )
  .bind(include_seed)
  .fetch_all(pool)
  .await?;

  let exercise_rows: Vec<ExerciseRow> = sqlx::query_as(
    r#"
    SELECT e.id, e.workout_id, e.name, e.position
    FROM exercises e
    JOIN workouts w ON w.id = e.workout_id
    WHERE ?1 OR w.is_seed = 0
    ORDER BY e.position ASC, e.id ASC
    "#,
  )
  .bind(include_seed)
  .fetch_all(pool)
  .await?;

  let set_rows: Vec<SetRow> = sqlx::query_as(
    r#"
    SELECT s.id, s.exercise_id, s.set_number, s.weight_kg, s.reps, s.rpe, s.is_logged
    FROM sets s
    JOIN exercises e ON e.id = s.exercise_id
    JOIN workouts w ON w.id = e.workout_id
    WHERE ?1 OR w.is_seed = 0
    ORDER BY s.set_number ASC, s.id ASC
    "#,
  )
  .bind(include_seed)
  .fetch_all(pool)
  .await?;

  let mut sets_by_exercise: HashMap<String, Vec<SetEntry>> = HashMap::new();
  for row in set_rows {
    sets_by_exercise
      .entry(row.exercise_id.clone())
      .or_default()
      .push(SetEntry::from(row));
  }

  let mut exercises_by_workout: HashMap<String, Vec<Exercise>> = HashMap::new();
  for row in exercise_rows {
    let sets = sets_by_exercise.remove(&row.id).unwrap_or_default();
    exercises_by_workout
      .entry(row.workout_id)
      .or_default()
      .push(Exercise {
        id: row.id,
        name: row.name,
        position: row.position,
        sets,
      });
  }

  let sessions: Vec<Session> = rows
    .into_iter()
    .map(|row| {
      let exercises = exercises_by_workout.remove(&row.id).unwrap_or_default();
      Session {
        id: row.id,
        name: row.name,
        started_at: row.started_at,
        completed_at: row.completed_at,
        is_seed: row.is_seed,
        exercises,
      }
    })
    .collect();

  tracing::debug!(sessions = sessions.len(), include_seed, "Loaded workout history");
  Ok(sessions)
}

/// Write a session with all of its exercises and sets in one transaction
pub async fn insert_session(pool: &DbPool, session: &Session) -> Result<(), StoreError> {
  let mut tx = pool.begin().await?;

  sqlx::query(
    r#"
    INSERT INTO workouts (id, name, started_at, completed_at, is_seed)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(&session.id)
  .bind(&session.name)
  .bind(session.started_at)
  .bind(session.completed_at)
  .bind(session.is_seed)
  .execute(&mut *tx)
  .await?;

  for exercise in &session.exercises {
    sqlx::query(
      r#"
      INSERT INTO exercises (id, workout_id, name, position)
      VALUES (?1, ?2, ?3, ?4)
      "#,
    )
    .bind(&exercise.id)
    .bind(&session.id)
    .bind(&exercise.name)
    .bind(exercise.position)
    .execute(&mut *tx)
    .await?;

    for set in &exercise.sets {
      sqlx::query(
        r#"
        INSERT INTO sets (id, exercise_id, set_number, weight_kg, reps, rpe, is_logged)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
      )
      .bind(&set.id)
      .bind(&exercise.id)
      .bind(set.set_number)
      .bind(set.weight_kg)
      .bind(set.reps)
      .bind(set.rpe)
      .bind(set.is_logged)
      .execute(&mut *tx)
      .await?;
    }
  }

  tx.commit().await?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{
    datetime_at, lifting_set, mock_exercise, mock_session, rated_set, seed_test_sessions,
    setup_test_db, teardown_test_db,
  };

  #[tokio::test]
  async fn test_load_empty_store() {
    let pool = setup_test_db().await;

    let sessions = load_sessions(&pool, true).await.expect("load");
    assert!(sessions.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_round_trip_preserves_structure() {
    let pool = setup_test_db().await;

    let session = mock_session(
      datetime_at(2024, 3, 4, 18),
      vec![
        mock_exercise("Back Squat", vec![rated_set(100.0, 5, 8.0), lifting_set(105.0, 3)]),
        mock_exercise("Pull-ups", vec![crate::test_utils::mock_set(None, Some(10), None)]),
      ],
    );
    insert_session(&pool, &session).await.expect("insert");

    let loaded = load_sessions(&pool, false).await.expect("load");
    assert_eq!(loaded.len(), 1);

    let got = &loaded[0];
    assert_eq!(got.id, session.id);
    assert_eq!(got.started_at, session.started_at);
    assert_eq!(got.completed_at, session.completed_at);
    assert_eq!(got.exercises.len(), 2);
    assert_eq!(got.exercises[0].name, "Back Squat");
    assert_eq!(got.exercises[1].name, "Pull-ups");

    let squat_sets = &got.exercises[0].sets;
    assert_eq!(squat_sets.len(), 2);
    assert_eq!(squat_sets[0].weight_kg, Some(100.0));
    assert_eq!(squat_sets[0].rpe, Some(8.0));
    assert_eq!(squat_sets[1].reps, Some(3));
    assert_eq!(got.exercises[1].sets[0].weight_kg, None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sessions_come_back_oldest_first() {
    let pool = setup_test_db().await;

    let newer = mock_session(datetime_at(2024, 3, 11, 18), vec![]);
    let older = mock_session(datetime_at(2024, 3, 4, 18), vec![]);
    insert_session(&pool, &newer).await.expect("insert newer");
    insert_session(&pool, &older).await.expect("insert older");

    let loaded = load_sessions(&pool, false).await.expect("load");
    let ids: Vec<_> = loaded.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![older.id, newer.id]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_sessions_are_gated() {
    let pool = setup_test_db().await;

    seed_test_sessions(&pool, 2, datetime_at(2024, 3, 4, 18)).await;
    let mut sample = mock_session(
      datetime_at(2024, 3, 5, 18),
      vec![mock_exercise("Bench Press", vec![lifting_set(60.0, 10)])],
    );
    sample.is_seed = true;
    insert_session(&pool, &sample).await.expect("insert seed");

    let real_only = load_sessions(&pool, false).await.expect("load");
    assert_eq!(real_only.len(), 2);
    assert!(real_only.iter().all(|s| !s.is_seed));

    let everything = load_sessions(&pool, true).await.expect("load");
    assert_eq!(everything.len(), 3);
    let seeded = everything.iter().find(|s| s.is_seed).expect("seed session");
    assert_eq!(seeded.exercises[0].sets.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_loaded_history_feeds_metrics() {
    let pool = setup_test_db().await;

    seed_test_sessions(&pool, 3, datetime_at(2024, 3, 4, 18)).await;
    let sessions = load_sessions(&pool, false).await.expect("load");
    let doc = crate::analysis::compute_metrics(&sessions, 26);

    assert_eq!(&doc.consistency.sessions[23..], &[1, 1, 1]);
    assert_eq!(doc.consistency.weeks_trained, 3);
    // 7.5 rounds to 8 -> two reps in reserve
    assert_eq!(doc.intensity.moderate, 3);

    let squat = doc.lifts.get(crate::classify::LiftKey::Squat).expect("squat");
    assert_eq!(squat.freq, 3);
    // Heaviest top set is the oldest session (102 kg); newest two are kept
    assert_eq!(squat.top.len(), 2);
    assert_eq!(squat.top[0].weight, 100);
    assert_eq!(squat.top[1].weight, 101);
    assert_eq!(doc.prs[0].weight, 102);

    teardown_test_db(pool).await;
  }
}
