use crate::models::domain::MatchRecord;
use serde::{Deserialize, Serialize};

/// Response for a manual detection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub candidates: usize,
    #[serde(rename = "matchesFound")]
    pub matches_found: usize,
    #[serde(rename = "recordsCreated")]
    pub records_created: usize,
}

/// Response for listing a subject's persisted matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matches: Vec<MatchRecord>,
    pub count: usize,
}

/// Response for watch start/stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub watching: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
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
