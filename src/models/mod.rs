// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilitySlot, DetectedMatch, MatchRecord, MatchScore, MatchStatus, PersonalityType,
    Profile, ScoringWeights,
};
pub use requests::{RunDetectionRequest, WatchRequest};
pub use responses::{
    DetectionResponse, ErrorResponse, HealthResponse, MatchListResponse, WatchResponse,
};
