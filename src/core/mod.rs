// Core algorithm exports
pub mod detector;
pub mod pass;
pub mod scoring;
pub mod similarity;
pub mod watcher;

pub use detector::{MatchDetector, DEFAULT_MATCH_THRESHOLD};
pub use pass::{record_matches, run_pass, PassOutcome};
pub use scoring::score_pair;
pub use similarity::{similarity, similarity_opt};
pub use watcher::{spawn_profile_poller, MatchSession};
