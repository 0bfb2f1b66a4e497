use crate::build::ValidationError;
use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid build settings: {0}")]
    Validation(#[from] ValidationError),
}
