use crate::models::Profile;
use crate::services::ports::{PortError, ProfileDirectory, Severity};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<AppwriteError> for PortError {
    fn from(e: AppwriteError) -> Self {
        PortError::Backend(e.to_string())
    }
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub profiles: String,
    pub notifications: String,
}

/// Appwrite API client
///
/// Handles all communication with the Appwrite backend:
/// - Reading the subject's profile and the candidate pool
/// - Writing notification documents for newly found matches
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn document_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    /// Fetch one profile document by its id. `Ok(None)` when it does not
    /// exist (yet).
    pub async fn fetch_profile(&self, id: &str) -> Result<Option<Profile>, AppwriteError> {
        let url = format!("{}/{}", self.document_url(&self.collections.profiles), id);

        tracing::debug!("Fetching profile for user: {}", id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to fetch profile: {}",
                status
            )));
        }

        let doc: Value = response.json().await?;
        parse_profile(&doc)
            .map(Some)
            .ok_or_else(|| AppwriteError::InvalidResponse(format!("Unparseable profile {}", id)))
    }

    /// Fetch the candidate pool: every profile except the given subject.
    ///
    /// Documents that fail to parse are skipped, not fatal; a half-filled
    /// pool beats an aborted pass.
    pub async fn fetch_profiles(&self, excluding: &str) -> Result<Vec<Profile>, AppwriteError> {
        let queries = vec![format!("notEqual(\"$id\", \"{}\")", excluding)];
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?;
        let encoded_queries = urlencoding::encode(&queries_json);

        let url = format!(
            "{}?query={}",
            self.document_url(&self.collections.profiles),
            encoded_queries
        );

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to list profiles: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let profiles: Vec<Profile> = documents
            .iter()
            .filter_map(parse_profile)
            .filter(|p| p.id != excluding)
            .collect();

        tracing::debug!(
            "Listed {} candidate profiles (of {} documents)",
            profiles.len(),
            documents.len()
        );

        Ok(profiles)
    }

    /// Write a notification document. Best-effort from the caller's point of
    /// view; failures surface as errors here and are logged by the port impl.
    pub async fn create_notification(
        &self,
        message: &str,
        severity: Severity,
    ) -> Result<(), AppwriteError> {
        let url = self.document_url(&self.collections.notifications);

        let payload = serde_json::json!({
            "$id": uuid::Uuid::new_v4().to_string(),
            "message": message,
            "severity": severity.as_str(),
            "createdAt": chrono::Utc::now(),
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to create notification: {}",
                response.status()
            )));
        }

        tracing::debug!("Notification created ({})", severity.as_str());

        Ok(())
    }
}

/// Extract a profile from an Appwrite document envelope. The document id
/// lives in `$id`; some deployments nest the fields under `data`.
fn parse_profile(doc: &Value) -> Option<Profile> {
    let data = doc.get("data").unwrap_or(doc);
    let mut profile: Profile = serde_json::from_value(data.clone()).ok()?;

    if profile.id.is_empty() {
        if let Some(id) = doc.get("$id").and_then(|v| v.as_str()) {
            profile.id = id.to_string();
        }
    }

    if profile.id.is_empty() {
        return None;
    }

    Some(profile)
}

#[async_trait]
impl ProfileDirectory for AppwriteClient {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PortError> {
        self.fetch_profile(id).await.map_err(PortError::from)
    }

    async fn list_profiles(&self, excluding: &str) -> Result<Vec<Profile>, PortError> {
        self.fetch_profiles(excluding).await.map_err(PortError::from)
    }
}

#[async_trait]
impl crate::services::ports::Notifier for AppwriteClient {
    async fn notify(&self, message: &str, severity: Severity) {
        if let Err(e) = self.create_notification(message, severity).await {
            tracing::warn!("Notification delivery failed: {}", e);
        }
    }
}
