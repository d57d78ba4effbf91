//! Context blocks handed to the coaching assistant
//!
//! The assistant receives plain strings. The metrics block carries the full
//! aggregation; the current-state snapshot describes what the user is doing
//! right now inside an active workout.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::compute_metrics;
use crate::calendar::serialize_iso;
use crate::models::{Exercise, Session};
use crate::strength::round_weight;

pub const METRICS_BLOCK_PREFIX: &str = "METRICS_JSON:\n";

/// Drop seed/sample sessions unless the user opted in
pub fn filter_seed(sessions: Vec<Session>, include_seed: bool) -> Vec<Session> {
  if include_seed {
    return sessions;
  }
  sessions.into_iter().filter(|s| !s.is_seed).collect()
}

/// Metrics context lines for the assistant. No history means no block at all.
pub fn build_metrics_context(sessions: &[Session], span_weeks: usize) -> Vec<String> {
  if sessions.is_empty() {
    return Vec::new();
  }
  let document = compute_metrics(sessions, span_weeks);
  vec![format!("{}{}", METRICS_BLOCK_PREFIX, document.to_json())]
}

/// ---------------------------------------------------------------------------
/// Current State Snapshot
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSet {
  pub set_number: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight_kg: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reps: Option<i64>,
  pub is_logged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestState {
  pub remaining_seconds: i64,
  pub total_seconds: i64,
}

/// Snapshot of an in-progress workout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentState {
  #[serde(rename = "type")]
  pub kind: &'static str,
  pub workout_id: String,
  pub workout_name: String,
  #[serde(rename = "started_at_iso", serialize_with = "serialize_iso")]
  pub started_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exercise_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exercise_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub active_set: Option<ActiveSet>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rest: Option<RestState>,
}

impl CurrentState {
  pub const KIND: &'static str = "CURRENT_STATE_JSON";

  /// Capture the snapshot at `now`.
  ///
  /// The active set is the one with `next_set_id`, falling back to the
  /// highest-numbered set; it is omitted when no set id is given. Rest is
  /// reported only while the timer is still running.
  pub fn capture(
    session: &Session,
    current_exercise: Option<&Exercise>,
    rest_end_at: Option<DateTime<Utc>>,
    rest_total_seconds: i64,
    next_set_id: Option<&str>,
    now: DateTime<Utc>,
  ) -> Self {
    let active_set = match (current_exercise, next_set_id) {
      (Some(exercise), Some(set_id)) => {
        let mut sorted: Vec<_> = exercise.sets.iter().collect();
        sorted.sort_by_key(|s| s.set_number);
        sorted
          .iter()
          .find(|s| s.id == set_id)
          .or(sorted.last())
          .map(|s| ActiveSet {
            set_number: s.set_number,
            weight_kg: s.weight_kg.map(round_weight),
            reps: s.reps,
            is_logged: s.is_logged,
          })
      }
      _ => None,
    };

    let rest = rest_end_at
      .filter(|end| *end > now)
      .map(|end| RestState {
        remaining_seconds: (end - now).num_seconds().max(0),
        total_seconds: rest_total_seconds,
      });

    Self {
      kind: Self::KIND,
      workout_id: session.id.clone(),
      workout_name: session.name.clone(),
      started_at: session.started_at,
      exercise_id: current_exercise.map(|e| e.id.clone()),
      exercise_name: current_exercise.map(|e| e.name.clone()),
      active_set,
      rest,
    }
  }

  /// Encoding failure degrades to an empty object
  pub fn to_json(&self) -> String {
    serde_json::to_string(self).unwrap_or_else(|e| {
      tracing::warn!(error = %e, "Failed to encode current state, using empty context");
      "{}".to_string()
    })
  }
}
