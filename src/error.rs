use crate::alter::AlterError;
use crate::config::ConfigError;
use crate::profile::ValidationError;
use thiserror::Error;

/// Top-level error type for the markercluster-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("profile alter failed: {0}")]
    Alter(#[from] AlterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to serialize profiles: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map info requires base profiles")]
    MissingProfiles,
}
