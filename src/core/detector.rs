use crate::core::scoring::score_pair;
use crate::models::{DetectedMatch, Profile, ScoringWeights};
use std::collections::HashSet;

/// Default compatibility threshold a pair must reach to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 50.0;

/// Scores a subject against a candidate pool and keeps the pairs at or above
/// the configured threshold.
///
/// # Pipeline stages
/// 1. Drop the subject itself and candidates already matched
/// 2. Score the remaining pairs
/// 3. Keep candidates with `score >= threshold`
#[derive(Debug, Clone)]
pub struct MatchDetector {
    weights: ScoringWeights,
    threshold: f64,
}

impl MatchDetector {
    pub fn new(weights: ScoringWeights, threshold: f64) -> Self {
        Self { weights, threshold }
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: ScoringWeights::default(),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run one detection over a candidate pool.
    ///
    /// `already_matched` holds candidate ids with an existing record for this
    /// subject; they are skipped so re-detection stays idempotent. The output
    /// carries no ordering guarantee; callers sort for display if they need
    /// to. An empty pool yields an empty result.
    pub fn detect(
        &self,
        subject_id: &str,
        subject: &Profile,
        candidates: &[Profile],
        already_matched: &HashSet<String>,
    ) -> Vec<DetectedMatch> {
        candidates
            .iter()
            .filter(|candidate| candidate.id != subject_id)
            .filter(|candidate| !already_matched.contains(&candidate.id))
            .filter_map(|candidate| {
                let score = score_pair(subject, candidate, &self.weights);
                if score.total >= self.threshold {
                    Some(DetectedMatch {
                        candidate_id: candidate.id.clone(),
                        display_name: candidate.display_name.clone(),
                        score: score.total,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for MatchDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}
