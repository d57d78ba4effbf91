pub mod analysis;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod strength;

#[cfg(test)]
mod test_utils;

pub use analysis::{compute_metrics, compute_metrics_at, Aggregation, AggregationDiagnostics};
pub use config::MetricsConfig;
pub use context::{build_metrics_context, filter_seed, CurrentState};
pub use error::AppError;
pub use models::{Exercise, MetricsDocument, Session, SetEntry};

/// Load history from the store and print the metrics context block.
/// Prints nothing when there is no history to summarize.
pub async fn run() -> Result<(), AppError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  logging::init_logging();

  let config = MetricsConfig::from_env()?;
  tracing::debug!(
    span_weeks = config.span_weeks,
    include_seed = config.include_seed,
    "Configuration loaded"
  );

  let pool = db::initialize_db(&config.database_url).await?;
  let lines = load_metrics_context(&pool, &config).await;
  pool.close().await;

  let lines = lines?;
  if lines.is_empty() {
    tracing::info!("No workout history, nothing to summarize");
  }
  for line in lines {
    println!("{}", line);
  }

  Ok(())
}

/// Metrics context for the stored history. Seed sessions are gated here, once.
pub async fn load_metrics_context(
  pool: &db::DbPool,
  config: &MetricsConfig,
) -> Result<Vec<String>, db::StoreError> {
  let sessions = db::load_sessions(pool, true).await?;
  let sessions = filter_seed(sessions, config.include_seed);
  Ok(build_metrics_context(&sessions, config.span_weeks))
}
