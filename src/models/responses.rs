use serde::{Deserialize, Serialize};
use crate::models::domain::{Algorithm, MatchResult};

/// Response for the matches endpoint
///
/// `algo` reports the scorer that actually served the request, which is
/// `rule` whenever an `ai` request fell back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub algo: Algorithm,
    pub matches: Vec<MatchResult>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "profileCount")]
    pub profile_count: usize,
    #[serde(rename = "learnedModelLoaded")]
    pub learned_model_loaded: bool,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
