use crate::config::ConfigError;
use crate::db::StoreError;

/// Failures of the command-line surface. The metrics engine itself does not fail.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),
}
