//! Deterministic aggregation layer for strength-training history
//!
//! One forward pass over sessions -> exercises -> sets builds every weekly and
//! per-lift statistic at once. The coaching assistant reads the resulting
//! document instead of doing arithmetic over raw logs itself.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::calendar::WeekWindow;
use crate::classify::{classify_lift, classify_muscle_group, LiftKey, MuscleGroup};
use crate::models::metrics::{
  Consistency, IntensityCounts, LiftDetail, LiftDetails, MetricsDocument, MuscleGroupVolume,
  PersonalRecord, TopSet, UNIT_TAG,
};
use crate::models::{Exercise, Session};
use crate::strength::{
  classify_intensity, estimate_one_rep_max, exertion_in_range, round_weight, set_volume, Intensity,
};

/// Top sets retained per lift
pub const TOP_SETS_PER_LIFT: usize = 2;

/// ---------------------------------------------------------------------------
/// Entry points
/// ---------------------------------------------------------------------------

/// Metrics for `sessions`, with the window ending at the week of the latest session start.
/// Input order is not trusted for the anchor; an empty history yields an all-zero document.
pub fn compute_metrics(sessions: &[Session], span_weeks: usize) -> MetricsDocument {
  match WeekWindow::for_sessions(sessions, span_weeks) {
    Some(window) => Aggregation::run(sessions, &window).into_document(),
    None => Aggregation::empty(span_weeks.max(1)).into_document(),
  }
}

/// Same as [`compute_metrics`] but with the window end given explicitly
pub fn compute_metrics_at(
  sessions: &[Session],
  span_weeks: usize,
  latest: &DateTime<Utc>,
) -> MetricsDocument {
  let window = WeekWindow::ending_at(latest, span_weeks);
  Aggregation::run(sessions, &window).into_document()
}

/// ---------------------------------------------------------------------------
/// Accumulators
/// ---------------------------------------------------------------------------

/// Input oddities seen during a pass. Logged, never emitted in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationDiagnostics {
  pub sessions_scanned: usize,
  pub sessions_outside_window: usize,
  /// Exertion readings outside 0-10 (still binned after clamping) or non-finite (dropped)
  pub out_of_range_exertion: usize,
}

#[derive(Debug, Clone)]
struct LiftAccumulator {
  freq: i64,
  vol: Vec<i64>,
  e1rm: Vec<i64>,
  top: Vec<TopSet>,
}

impl LiftAccumulator {
  fn new(span_weeks: usize) -> Self {
    Self {
      freq: 0,
      vol: vec![0; span_weeks],
      e1rm: vec![0; span_weeks],
      top: Vec::new(),
    }
  }
}

/// Heaviest set (by e1RM) within one exercise occurrence
#[derive(Debug, Clone, Copy)]
struct BestSet {
  e1rm: f64,
  weight: i64,
  reps: i64,
}

#[derive(Debug, Clone)]
struct RecordEntry {
  date: DateTime<Utc>,
  weight: i64,
  reps: i64,
  e1rm: f64,
}

impl IntensityCounts {
  fn record(&mut self, intensity: Intensity) {
    match intensity {
      Intensity::Easy => self.easy += 1,
      Intensity::Moderate => self.moderate += 1,
      Intensity::Hard => self.hard += 1,
    }
  }
}

/// Accumulated state of one pass. Local to a single call; nothing is shared.
#[derive(Debug, Clone)]
pub struct Aggregation {
  span_weeks: usize,
  sessions_per_week: Vec<i64>,
  intensity: IntensityCounts,
  muscle_volume: BTreeMap<MuscleGroup, Vec<i64>>,
  lifts: BTreeMap<LiftKey, LiftAccumulator>,
  records: BTreeMap<LiftKey, RecordEntry>,
  diagnostics: AggregationDiagnostics,
}

impl Aggregation {
  pub fn empty(span_weeks: usize) -> Self {
    Self {
      span_weeks,
      sessions_per_week: vec![0; span_weeks],
      intensity: IntensityCounts::default(),
      muscle_volume: MuscleGroup::ALL
        .iter()
        .map(|mg| (*mg, vec![0; span_weeks]))
        .collect(),
      lifts: BTreeMap::new(),
      records: BTreeMap::new(),
      diagnostics: AggregationDiagnostics::default(),
    }
  }

  /// Scan `sessions` in the order given. Sessions outside `window` are skipped entirely,
  /// including for personal records.
  pub fn run(sessions: &[Session], window: &WeekWindow) -> Self {
    let mut agg = Self::empty(window.span_weeks());

    for session in sessions {
      agg.diagnostics.sessions_scanned += 1;
      let Some(week) = window.week_index(&session.started_at) else {
        agg.diagnostics.sessions_outside_window += 1;
        continue;
      };

      agg.sessions_per_week[week] += 1;
      for exercise in &session.exercises {
        agg.add_exercise(week, session.started_at, exercise);
      }
    }

    for lift in agg.lifts.values_mut() {
      // Stable sort: same-date entries keep scan order
      lift.top.sort_by(|a, b| b.date.cmp(&a.date));
      lift.top.truncate(TOP_SETS_PER_LIFT);
    }

    tracing::debug!(
      sessions = agg.diagnostics.sessions_scanned,
      skipped = agg.diagnostics.sessions_outside_window,
      lifts = agg.lifts.len(),
      span_weeks = agg.span_weeks,
      "Aggregated training history"
    );
    if agg.diagnostics.out_of_range_exertion > 0 {
      tracing::warn!(
        count = agg.diagnostics.out_of_range_exertion,
        "Exertion readings outside 0-10 were clamped or dropped"
      );
    }

    agg
  }

  fn add_exercise(&mut self, week: usize, date: DateTime<Utc>, exercise: &Exercise) {
    let lift = classify_lift(&exercise.name);
    let muscle = classify_muscle_group(&exercise.name);

    let mut best: Option<BestSet> = None;
    let mut volume = 0i64;

    for set in &exercise.sets {
      if let Some(rpe) = set.rpe {
        if !exertion_in_range(rpe) {
          self.diagnostics.out_of_range_exertion += 1;
        }
        if let Some(intensity) = classify_intensity(rpe) {
          self.intensity.record(intensity);
        }
      }

      if let Some(v) = set_volume(set.weight_kg, set.reps) {
        volume = volume.saturating_add(v);
      }

      if let (Some(weight), Some(reps)) = (set.weight_kg, set.reps) {
        if let Some(e1rm) = estimate_one_rep_max(weight, reps) {
          // Strict: the first set reaching a value keeps it
          if e1rm > best.map_or(0.0, |b| b.e1rm) {
            best = Some(BestSet {
              e1rm,
              weight: round_weight(weight),
              reps,
            });
          }
        }
      }
    }

    if let Some(mg) = muscle {
      if volume > 0 {
        if let Some(weeks) = self.muscle_volume.get_mut(&mg) {
          weeks[week] = weeks[week].saturating_add(volume);
        }
      }
    }

    let Some(lift) = lift else {
      return;
    };

    let span_weeks = self.span_weeks;
    let acc = self
      .lifts
      .entry(lift)
      .or_insert_with(|| LiftAccumulator::new(span_weeks));
    acc.freq += 1;
    acc.vol[week] = acc.vol[week].saturating_add(volume);

    let Some(best) = best else {
      return;
    };

    let rounded = best.e1rm.round() as i64;
    if rounded > acc.e1rm[week] {
      acc.e1rm[week] = rounded;
    }
    acc.top.push(TopSet {
      date,
      weight: best.weight,
      reps: best.reps,
    });

    // Unrounded comparison; ties keep the earlier record
    let replace = self
      .records
      .get(&lift)
      .map_or(true, |prev| best.e1rm > prev.e1rm);
    if replace {
      self.records.insert(
        lift,
        RecordEntry {
          date,
          weight: best.weight,
          reps: best.reps,
          e1rm: best.e1rm,
        },
      );
    }
  }

  pub fn diagnostics(&self) -> AggregationDiagnostics {
    self.diagnostics
  }

  pub fn span_weeks(&self) -> usize {
    self.span_weeks
  }

  /// Best-ever unrounded e1RM tracked for a lift
  pub fn record_e1rm(&self, lift: LiftKey) -> Option<f64> {
    self.records.get(&lift).map(|r| r.e1rm)
  }

  /// ---------------------------------------------------------------------------
  /// Document assembly
  /// ---------------------------------------------------------------------------

  pub fn into_document(self) -> MetricsDocument {
    let span_weeks = self.span_weeks;
    let weeks_trained = self.sessions_per_week.iter().filter(|n| **n > 0).count();

    let mut muscle_volume = self.muscle_volume;
    let mut take = |mg: MuscleGroup| {
      muscle_volume
        .remove(&mg)
        .unwrap_or_else(|| vec![0; span_weeks])
    };
    let muscle_volume = MuscleGroupVolume {
      quad: take(MuscleGroup::Quad),
      ham: take(MuscleGroup::Hamstring),
      pec: take(MuscleGroup::Pectoral),
      back: take(MuscleGroup::Back),
      delt: take(MuscleGroup::Deltoid),
    };

    let mut prs: Vec<PersonalRecord> = self
      .records
      .into_iter()
      .map(|(lift, r)| PersonalRecord {
        lift,
        date: r.date,
        weight: r.weight,
        reps: r.reps,
      })
      .collect();
    // Newest first; same-date records stay in lift order
    prs.sort_by(|a, b| b.date.cmp(&a.date));

    let mut lifts = LiftDetails::default();
    let mut accumulated = self.lifts;
    for key in LiftKey::PREFERRED {
      if let Some(acc) = accumulated.remove(&key) {
        lifts.push(
          key,
          LiftDetail {
            freq: acc.freq,
            vol: acc.vol,
            e1rm: acc.e1rm,
            top: acc.top,
          },
        );
      }
    }

    MetricsDocument {
      unit: UNIT_TAG,
      span_weeks,
      consistency: Consistency {
        weeks_trained,
        sessions: self.sessions_per_week,
      },
      intensity: self.intensity,
      muscle_volume,
      prs,
      lifts,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Encoding
/// ---------------------------------------------------------------------------

impl MetricsDocument {
  /// Compact JSON for the assistant's context
  pub fn try_to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string(self)
  }

  /// Encoding failure degrades to an empty object rather than failing the caller
  pub fn to_json(&self) -> String {
    match self.try_to_json() {
      Ok(json) => json,
      Err(e) => {
        tracing::warn!(error = %e, "Failed to encode metrics document, using empty context");
        "{}".to_string()
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
