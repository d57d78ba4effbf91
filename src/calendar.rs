//! Calendar bucketing for the trailing training window
//!
//! Weeks are ISO weeks (Monday start) evaluated in UTC so the document does not
//! depend on the device's locale or timezone.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};
use serde::Serializer;

use crate::models::Session;

pub const DEFAULT_SPAN_WEEKS: usize = 26;

/// Monday (UTC) of the ISO week containing `ts`
pub fn week_start(ts: &DateTime<Utc>) -> NaiveDate {
  let date = ts.date_naive();
  let back = u64::from(date.weekday().num_days_from_monday());
  date.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// A run of `span_weeks` consecutive ISO weeks, the last one containing the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
  first_week: NaiveDate,
  span_weeks: usize,
}

impl WeekWindow {
  /// Window whose final bucket is the week of `latest`. A zero span is treated as one week.
  pub fn ending_at(latest: &DateTime<Utc>, span_weeks: usize) -> Self {
    let span_weeks = span_weeks.max(1);
    let last_week = week_start(latest);
    let back = 7u64.saturating_mul(span_weeks as u64 - 1);
    let first_week = last_week
      .checked_sub_days(Days::new(back))
      .unwrap_or(NaiveDate::MIN);

    Self {
      first_week,
      span_weeks,
    }
  }

  /// Anchor on the latest session start; does not trust input ordering.
  /// Returns None for an empty history.
  pub fn for_sessions(sessions: &[Session], span_weeks: usize) -> Option<Self> {
    sessions
      .iter()
      .map(|s| s.started_at)
      .max()
      .map(|latest| Self::ending_at(&latest, span_weeks))
  }

  pub fn span_weeks(&self) -> usize {
    self.span_weeks
  }

  pub fn first_week(&self) -> NaiveDate {
    self.first_week
  }

  /// Bucket for `ts`, 0 = oldest week. None when outside the window.
  pub fn week_index(&self, ts: &DateTime<Utc>) -> Option<usize> {
    let offset = (week_start(ts) - self.first_week).num_days().div_euclid(7);
    if offset < 0 || offset >= self.span_weeks as i64 {
      None
    } else {
      Some(offset as usize)
    }
  }
}

/// Week offset of `ts` within the `span_weeks` window ending at the week of `latest`
pub fn week_index(ts: &DateTime<Utc>, span_weeks: usize, latest: &DateTime<Utc>) -> Option<usize> {
  WeekWindow::ending_at(latest, span_weeks).week_index(ts)
}

/// UTC ISO-8601 with second precision, e.g. `2024-03-04T18:30:00Z`
pub fn format_iso(ts: &DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn serialize_iso<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&format_iso(ts))
}
