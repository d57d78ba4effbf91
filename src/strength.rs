//! Per-set numeric models: estimated one-rep max, volume, and effort bins

/// Nominal top of the perceived-exertion scale
pub const MAX_EXERTION: f64 = 10.0;

/// Estimated one-rep max: `weight * (1 + reps / 30)`.
///
/// This linear model is what the coaching history was built on; keep it even
/// though it differs from Epley/Brzycki. Defined only for a positive rep count.
pub fn estimate_one_rep_max(weight_kg: f64, reps: i64) -> Option<f64> {
  if reps <= 0 || !weight_kg.is_finite() {
    return None;
  }
  Some(weight_kg * (1.0 + reps as f64 / 30.0))
}

/// Volume load of one set (kg x reps), rounded to the nearest integer.
/// Negative rep counts are treated as missing.
pub fn set_volume(weight_kg: Option<f64>, reps: Option<i64>) -> Option<i64> {
  match (weight_kg, reps) {
    (Some(w), Some(r)) if r >= 0 && w.is_finite() => Some((w * r as f64).round() as i64),
    _ => None,
  }
}

/// Nearest whole kilogram, as shown in top sets and records
pub fn round_weight(weight_kg: f64) -> i64 {
  weight_kg.round() as i64
}

/// ---------------------------------------------------------------------------
/// Intensity
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
  /// 3+ reps in reserve
  Easy,
  /// 1-2 reps in reserve
  Moderate,
  /// Taken to failure
  Hard,
}

impl Intensity {
  pub fn from_rir(rir: i64) -> Self {
    match rir {
      r if r >= 3 => Intensity::Easy,
      r if r >= 1 => Intensity::Moderate,
      _ => Intensity::Hard,
    }
  }
}

/// Reps in reserve: exertion is rounded first, then subtracted from 10, floored at 0
pub fn reps_in_reserve(rpe: f64) -> i64 {
  (MAX_EXERTION - rpe.round()).max(0.0) as i64
}

/// None for a non-finite reading; those never land in a bin
pub fn classify_intensity(rpe: f64) -> Option<Intensity> {
  if !rpe.is_finite() {
    return None;
  }
  Some(Intensity::from_rir(reps_in_reserve(rpe)))
}

/// Whether a reading lies on the 0-10 scale
pub fn exertion_in_range(rpe: f64) -> bool {
  rpe.is_finite() && (0.0..=MAX_EXERTION).contains(&rpe)
}
