//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenvy` at startup.

use std::env;

use crate::calendar::DEFAULT_SPAN_WEEKS;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://trainer-metrics.db?mode=rwc";

/// Ten years of weekly buckets
pub const MAX_SPAN_WEEKS: usize = 520;

const DATABASE_URL: &str = "DATABASE_URL";
const SPAN_WEEKS: &str = "METRICS_SPAN_WEEKS";
const SHOW_SEED_DATA: &str = "SHOW_SEED_DATA";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?} ({reason})")]
  Invalid {
    key: &'static str,
    value: String,
    reason: &'static str,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
  pub database_url: String,
  /// Trailing window length in ISO weeks, at least 1
  pub span_weeks: usize,
  /// Include sample/seed sessions in the history
  pub include_seed: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      span_weeks: DEFAULT_SPAN_WEEKS,
      include_seed: false,
    }
  }
}

impl MetricsConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let database_url = env::var(DATABASE_URL)
      .ok()
      .filter(|url| !url.trim().is_empty())
      .unwrap_or(defaults.database_url);

    let span_weeks = match env::var(SPAN_WEEKS) {
      Ok(raw) => parse_span_weeks(&raw)?,
      Err(_) => defaults.span_weeks,
    };

    let include_seed = match env::var(SHOW_SEED_DATA) {
      Ok(raw) => parse_flag(SHOW_SEED_DATA, &raw)?,
      Err(_) => defaults.include_seed,
    };

    Ok(Self {
      database_url,
      span_weeks,
      include_seed,
    })
  }
}

fn parse_span_weeks(raw: &str) -> Result<usize, ConfigError> {
  let invalid = |reason| ConfigError::Invalid {
    key: SPAN_WEEKS,
    value: raw.to_string(),
    reason,
  };

  let weeks: usize = raw.trim().parse().map_err(|_| invalid("not a whole number"))?;
  if weeks == 0 {
    return Err(invalid("must be at least 1"));
  }
  if weeks > MAX_SPAN_WEEKS {
    return Err(invalid("must be at most 520"));
  }
  Ok(weeks)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" => Ok(true),
    "0" | "false" | "no" | "" => Ok(false),
    _ => Err(ConfigError::Invalid {
      key,
      value: raw.to_string(),
      reason: "expected true/false",
    }),
  }
}
