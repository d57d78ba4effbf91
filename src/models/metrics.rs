//! Output shape of the metrics document.
//!
//! Field names are short on purpose: the document is pasted verbatim into the
//! coaching assistant's context, and the consumer depends on these exact keys.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::calendar::serialize_iso;
use crate::classify::LiftKey;

/// Unit tag emitted in every document; weights are stored in kilograms
pub const UNIT_TAG: &str = "local";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsDocument {
  #[serde(rename = "u")]
  pub unit: &'static str,

  #[serde(rename = "span_wks")]
  pub span_weeks: usize,

  pub consistency: Consistency,

  pub intensity: IntensityCounts,

  #[serde(rename = "mg_vol")]
  pub muscle_volume: MuscleGroupVolume,

  /// Best-ever set per lift, newest first
  pub prs: Vec<PersonalRecord>,

  pub lifts: LiftDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consistency {
  #[serde(rename = "wks_trained")]
  pub weeks_trained: usize,
  /// Session count per week, oldest first
  pub sessions: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IntensityCounts {
  pub easy: i64,
  #[serde(rename = "med")]
  pub moderate: i64,
  pub hard: i64,
}

/// Weekly volume (kg x reps) per muscle group. All five groups are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleGroupVolume {
  pub quad: Vec<i64>,
  pub ham: Vec<i64>,
  pub pec: Vec<i64>,
  pub back: Vec<i64>,
  pub delt: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
  pub lift: LiftKey,
  #[serde(serialize_with = "serialize_iso")]
  pub date: DateTime<Utc>,
  #[serde(rename = "w")]
  pub weight: i64,
  #[serde(rename = "r")]
  pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSet {
  #[serde(rename = "d", serialize_with = "serialize_iso")]
  pub date: DateTime<Utc>,
  #[serde(rename = "w")]
  pub weight: i64,
  #[serde(rename = "r")]
  pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftDetail {
  /// Exercise occurrences inside the window
  pub freq: i64,
  pub vol: Vec<i64>,
  pub e1rm: Vec<i64>,
  pub top: Vec<TopSet>,
}

/// Per-lift detail in emission order.
///
/// Serialized as a JSON object whose keys keep insertion order, so the
/// output is stable without relying on map iteration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiftDetails(Vec<(LiftKey, LiftDetail)>);

impl LiftDetails {
  pub fn push(&mut self, lift: LiftKey, detail: LiftDetail) {
    self.0.push((lift, detail));
  }

  pub fn get(&self, lift: LiftKey) -> Option<&LiftDetail> {
    self.0.iter().find(|(k, _)| *k == lift).map(|(_, d)| d)
  }

  pub fn keys(&self) -> impl Iterator<Item = LiftKey> + '_ {
    self.0.iter().map(|(k, _)| *k)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl Serialize for LiftDetails {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (lift, detail) in &self.0 {
      map.serialize_entry(lift.as_str(), detail)?;
    }
    map.end()
  }
}
