use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run one detection pass for a subject
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunDetectionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to start or stop watching a subject's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
