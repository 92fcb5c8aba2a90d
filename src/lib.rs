//! Persona Match - compatibility matching service for the Persona marketplace
//!
//! Scores pairwise compatibility between user profiles (personality type,
//! availability, interests), detects matches above a configurable threshold,
//! persists them idempotently, and re-runs detection whenever a watched
//! subject's profile changes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    record_matches, run_pass, score_pair, similarity, MatchDetector, MatchSession, PassOutcome,
    DEFAULT_MATCH_THRESHOLD,
};
pub use crate::models::{
    AvailabilitySlot, DetectedMatch, MatchRecord, MatchScore, MatchStatus, PersonalityType,
    Profile, ScoringWeights,
};
pub use crate::services::{MatchRecordStore, Notifier, PortError, ProfileDirectory, Severity};
