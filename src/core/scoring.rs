use crate::core::similarity::similarity;
use crate::models::{AvailabilitySlot, MatchScore, Profile, ScoringWeights};
use std::collections::HashSet;

/// Total factor slots in the scoring formula.
const FACTOR_SLOTS: f64 = 3.0;

/// Score a profile pair for compatibility.
///
/// Scoring formula, with default weights:
///     personality  = similarity(typeA, typeB) * 30
///     availability = |A ∩ B| / max(|A|, |B|) * 30
///     interests    = |A ∩ B| / max(|A|, |B|) * 40
///
/// A factor only contributes when both profiles have data for it; missing
/// data excludes the factor entirely rather than counting as zero. The total
/// is the contribution sum normalized by the *count* of included factors
/// (rescaled to the full three-slot range), not by the sum of included
/// weights. That keeps scores comparable with the thresholds persisted by
/// earlier versions, at the cost of a known skew: a pair with only the
/// interests factor tops out at 120, so the scale is 0-100-ish rather than a
/// strict bound.
///
/// Symmetric in its arguments and never errors on missing or empty fields.
pub fn score_pair(a: &Profile, b: &Profile, weights: &ScoringWeights) -> MatchScore {
    let personality = match (a.personality_type, b.personality_type) {
        (Some(type_a), Some(type_b)) => Some(similarity(type_a, type_b) * weights.personality),
        _ => None,
    };

    let availability =
        slot_overlap(&a.availability, &b.availability).map(|ratio| ratio * weights.availability);

    let interests =
        interest_overlap(&a.interests, &b.interests).map(|ratio| ratio * weights.interests);

    let included: Vec<f64> = [personality, availability, interests]
        .into_iter()
        .flatten()
        .collect();

    let total = if included.is_empty() {
        0.0
    } else {
        let sum: f64 = included.iter().sum();
        (sum * FACTOR_SLOTS / included.len() as f64).round()
    };

    MatchScore {
        total,
        personality,
        availability,
        interests,
    }
}

/// Overlap ratio between two availability sets, `None` when either is empty.
fn slot_overlap(a: &[AvailabilitySlot], b: &[AvailabilitySlot]) -> Option<f64> {
    let set_a: HashSet<AvailabilitySlot> = a.iter().copied().collect();
    let set_b: HashSet<AvailabilitySlot> = b.iter().copied().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }

    let shared = set_a.intersection(&set_b).count();
    Some(shared as f64 / set_a.len().max(set_b.len()) as f64)
}

/// Overlap ratio between two interest tag sets, `None` when either is empty.
///
/// Interests are free text, so tags are trimmed and lowercased before
/// comparison; blank tags are ignored.
fn interest_overlap(a: &[String], b: &[String]) -> Option<f64> {
    let set_a = normalize_tags(a);
    let set_b = normalize_tags(b);

    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }

    let shared = set_a.intersection(&set_b).count();
    Some(shared as f64 / set_a.len().max(set_b.len()) as f64)
}

fn normalize_tags(tags: &[String]) -> HashSet<String> {
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
