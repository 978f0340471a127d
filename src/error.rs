use thiserror::Error;
use crate::models::UserId;

/// Errors raised by a ranking call
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("userId {0} not in profiles")]
    NotFound(UserId),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised while loading a learned model artifact or its metadata
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// Errors raised while loading the profile directory
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("Failed to read profiles: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profiles: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse profile CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid profile source: {0}")]
    Invalid(String),
}
