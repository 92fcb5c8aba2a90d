//! Collaborator interfaces between the matching core and the outside world.
//!
//! The core only ever talks to the external profile directory, the match
//! record store, and the notification channel through these traits, so the
//! detection pipeline is testable with in-memory fakes.

use crate::models::{MatchRecord, Profile};
use async_trait::async_trait;
use thiserror::Error;

/// Failure crossing the persistence or trust boundary.
///
/// Collaborator errors are non-fatal to the subscription lifecycle: reads
/// abort the current pass, writes skip the affected record.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("store error: {0}")]
    Store(String),
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Read access to the externally owned profile collection.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch one profile by id; `None` when it does not exist yet.
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PortError>;

    /// Fetch the candidate pool, excluding the given subject.
    async fn list_profiles(&self, excluding: &str) -> Result<Vec<Profile>, PortError>;
}

/// Persistence for detected matches, unique per ordered pair.
#[async_trait]
pub trait MatchRecordStore: Send + Sync {
    async fn exists(&self, subject_id: &str, candidate_id: &str) -> Result<bool, PortError>;

    /// Create a record unless the pair already exists. Returns `true` when a
    /// new record was written.
    async fn create(&self, record: &MatchRecord) -> Result<bool, PortError>;

    /// Candidate ids already matched with the subject.
    async fn matched_candidates(&self, subject_id: &str) -> Result<Vec<String>, PortError>;
}

/// Fire-and-forget user-facing notifications. Delivery failures are the
/// implementation's problem to log; the core never waits on an ack.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, severity: Severity);
}
