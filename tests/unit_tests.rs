// Unit tests for Persona Match

use persona_match::core::{
    scoring::score_pair,
    similarity::{similarity, similarity_opt},
    MatchDetector, DEFAULT_MATCH_THRESHOLD,
};
use persona_match::models::{AvailabilitySlot, PersonalityType, Profile, ScoringWeights};
use std::collections::HashSet;

fn create_test_profile(
    id: &str,
    personality: Option<PersonalityType>,
    availability: &[AvailabilitySlot],
    interests: &[&str],
) -> Profile {
    Profile {
        id: id.to_string(),
        personality_type: personality,
        availability: availability.to_vec(),
        interests: interests.iter().map(|s| s.to_string()).collect(),
        is_available_for_rent: true,
        hourly_rate: 25.0,
        display_name: format!("User {}", id),
        bio: None,
        email: None,
        instagram_handle: None,
        photo_url: None,
        updated_at: None,
    }
}

#[test]
fn test_similarity_identical_is_one() {
    for kind in PersonalityType::ALL {
        assert_eq!(similarity(kind, kind), 1.0);
    }
}

#[test]
fn test_similarity_symmetric_and_bounded() {
    for a in PersonalityType::ALL {
        for b in PersonalityType::ALL {
            let forward = similarity(a, b);
            let backward = similarity(b, a);
            assert_eq!(forward, backward);
            assert!((0.0..=1.0).contains(&forward));
        }
    }
}

#[test]
fn test_similarity_graded_by_shared_axes() {
    // INTJ vs ENFP share one axis, INTJ vs ENTJ share three
    let far = similarity(PersonalityType::Analytical, PersonalityType::Creative);
    let near = similarity(PersonalityType::Analytical, PersonalityType::Leader);
    assert_eq!(far, 0.25);
    assert_eq!(near, 0.75);
    assert!(near > far);
}

#[test]
fn test_similarity_absent_side_is_zero() {
    assert_eq!(similarity_opt(Some(PersonalityType::Leader), None), 0.0);
    assert_eq!(similarity_opt(None, Some(PersonalityType::Leader)), 0.0);
    assert_eq!(similarity_opt(None, None), 0.0);
}

#[test]
fn test_score_identical_profiles_is_100() {
    let a = create_test_profile(
        "a",
        Some(PersonalityType::Creative),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Evening],
        &["chess", "hiking"],
    );
    let b = create_test_profile(
        "b",
        Some(PersonalityType::Creative),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Evening],
        &["chess", "hiking"],
    );

    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.total, 100.0);
    assert_eq!(score.factor_count(), 3);
    assert_eq!(score.personality, Some(30.0));
    assert_eq!(score.availability, Some(30.0));
    assert_eq!(score.interests, Some(40.0));
}

#[test]
fn test_score_disjoint_profiles_is_zero() {
    // All three factors present on both sides but nothing overlaps
    let a = create_test_profile(
        "a",
        Some(PersonalityType::Adventurous), // ESTP
        &[AvailabilitySlot::Morning],
        &["chess"],
    );
    let b = create_test_profile(
        "b",
        Some(PersonalityType::Counselor), // INFJ, zero shared axes
        &[AvailabilitySlot::Night],
        &["surfing"],
    );

    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.total, 0.0);
    assert_eq!(score.factor_count(), 3);
}

#[test]
fn test_score_partial_overlap() {
    let a = create_test_profile(
        "a",
        Some(PersonalityType::Analytical),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Evening],
        &["chess", "hiking"],
    );
    let b = create_test_profile(
        "b",
        Some(PersonalityType::Creative),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Night],
        &["chess", "surfing"],
    );

    // personality 0.25 * 30 + availability 0.5 * 30 + interests 0.5 * 40
    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.personality, Some(7.5));
    assert_eq!(score.availability, Some(15.0));
    assert_eq!(score.interests, Some(20.0));
    assert_eq!(score.total, 43.0);
}

#[test]
fn test_score_is_symmetric() {
    let a = create_test_profile(
        "a",
        Some(PersonalityType::Mediator),
        &[AvailabilitySlot::Weekends],
        &["yoga", "reading", "travel"],
    );
    let b = create_test_profile(
        "b",
        Some(PersonalityType::Entertainer),
        &[AvailabilitySlot::Weekends, AvailabilitySlot::Flexible],
        &["travel"],
    );

    let forward = score_pair(&a, &b, &ScoringWeights::default());
    let backward = score_pair(&b, &a, &ScoringWeights::default());
    assert_eq!(forward.total, backward.total);
    assert_eq!(forward.personality, backward.personality);
    assert_eq!(forward.availability, backward.availability);
    assert_eq!(forward.interests, backward.interests);
}

#[test]
fn test_score_missing_factors_excluded() {
    // Only interests carry data on both sides, so the average is over one
    // factor and a perfect overlap can exceed 100.
    let a = create_test_profile("a", None, &[], &["chess"]);
    let b = create_test_profile("b", None, &[], &["chess"]);

    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.factor_count(), 1);
    assert_eq!(score.personality, None);
    assert_eq!(score.availability, None);
    assert_eq!(score.interests, Some(40.0));
    assert_eq!(score.total, 120.0);
}

#[test]
fn test_score_no_data_at_all_is_zero() {
    let a = create_test_profile("a", None, &[], &[]);
    let b = create_test_profile("b", None, &[], &[]);

    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.factor_count(), 0);
    assert_eq!(score.total, 0.0);
}

#[test]
fn test_score_interests_case_insensitive() {
    let a = create_test_profile("a", None, &[], &["Chess", "HIKING"]);
    let b = create_test_profile("b", None, &[], &["chess", "hiking"]);

    let score = score_pair(&a, &b, &ScoringWeights::default());
    assert_eq!(score.interests, Some(40.0));
}

#[test]
fn test_detector_excludes_self() {
    let detector = MatchDetector::with_defaults();
    let subject = create_test_profile(
        "me",
        Some(PersonalityType::Leader),
        &[AvailabilitySlot::Evening],
        &["tennis"],
    );
    // Identical copy of the subject under the same id
    let candidates = vec![subject.clone()];

    let matches = detector.detect("me", &subject, &candidates, &HashSet::new());
    assert!(matches.is_empty());
}

#[test]
fn test_detector_excludes_already_matched() {
    let detector = MatchDetector::with_defaults();
    let subject = create_test_profile(
        "me",
        Some(PersonalityType::Leader),
        &[AvailabilitySlot::Evening],
        &["tennis"],
    );
    let twin = create_test_profile(
        "twin",
        Some(PersonalityType::Leader),
        &[AvailabilitySlot::Evening],
        &["tennis"],
    );

    let mut already = HashSet::new();
    already.insert("twin".to_string());

    let matches = detector.detect("me", &subject, &[twin], &already);
    assert!(matches.is_empty());
}

#[test]
fn test_detector_threshold_is_inclusive() {
    let detector = MatchDetector::new(ScoringWeights::default(), DEFAULT_MATCH_THRESHOLD);

    let subject = create_test_profile(
        "me",
        Some(PersonalityType::Analytical),
        &[AvailabilitySlot::Morning],
        &["chess", "hiking"],
    );
    // Same personality (30), disjoint availability (0), half the interests
    // (20): total lands exactly on the default threshold of 50.
    let boundary = create_test_profile(
        "boundary",
        Some(PersonalityType::Analytical),
        &[AvailabilitySlot::Night],
        &["chess", "surfing"],
    );

    let matches = detector.detect("me", &subject, &[boundary], &HashSet::new());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, 50.0);
}

#[test]
fn test_detector_below_threshold_filtered() {
    let detector = MatchDetector::with_defaults();
    let subject = create_test_profile(
        "me",
        Some(PersonalityType::Analytical),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Evening],
        &["chess", "hiking"],
    );
    // Scores 43 against the subject, under the default threshold of 50
    let weak = create_test_profile(
        "weak",
        Some(PersonalityType::Creative),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Night],
        &["chess", "surfing"],
    );
    let strong = create_test_profile(
        "strong",
        Some(PersonalityType::Analytical),
        &[AvailabilitySlot::Morning, AvailabilitySlot::Evening],
        &["chess", "hiking"],
    );

    let matches = detector.detect("me", &subject, &[weak, strong], &HashSet::new());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].candidate_id, "strong");
    assert_eq!(matches[0].score, 100.0);
}

#[test]
fn test_detected_match_carries_display_name() {
    let detector = MatchDetector::with_defaults();
    let subject = create_test_profile(
        "me",
        Some(PersonalityType::Supportive),
        &[AvailabilitySlot::Weekdays],
        &["baking"],
    );
    let candidate = create_test_profile(
        "friend",
        Some(PersonalityType::Supportive),
        &[AvailabilitySlot::Weekdays],
        &["baking"],
    );

    let matches = detector.detect("me", &subject, &[candidate], &HashSet::new());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].display_name, "User friend");
}
