use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged training session with its exercises, as supplied by the workout store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: String,
  pub name: String,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
  /// Sample/seed data is hidden unless the user opts in
  #[serde(default)]
  pub is_seed: bool,
  #[serde(default)]
  pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub position: i64,
  #[serde(default)]
  pub sets: Vec<SetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
  pub id: String,
  pub set_number: i64,
  /// Kilograms
  pub weight_kg: Option<f64>,
  pub reps: Option<i64>,
  /// Perceived exertion, nominally 0-10
  pub rpe: Option<f64>,
  #[serde(default)]
  pub is_logged: bool,
}

/// ---------------------------------------------------------------------------
/// Store rows (flat, one per table)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
  pub id: String,
  pub name: String,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
  pub is_seed: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRow {
  pub id: String,
  pub workout_id: String,
  pub name: String,
  pub position: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SetRow {
  pub id: String,
  pub exercise_id: String,
  pub set_number: i64,
  pub weight_kg: Option<f64>,
  pub reps: Option<i64>,
  pub rpe: Option<f64>,
  pub is_logged: bool,
}

impl From<SetRow> for SetEntry {
  fn from(row: SetRow) -> Self {
    Self {
      id: row.id,
      set_number: row.set_number,
      weight_kg: row.weight_kg,
      reps: row.reps,
      rpe: row.rpe,
      is_logged: row.is_logged,
    }
  }
}
