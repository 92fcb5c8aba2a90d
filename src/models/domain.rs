use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed set of personality categories a user can pick for their profile.
///
/// Each category carries a four-letter code over four independent dichotomy
/// axes (E/I, S/N, T/F, J/P). The similarity scorer compares codes
/// position-wise, so related categories score above zero without a full
/// pairwise lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonalityType {
    Analytical,
    Creative,
    Leader,
    Supportive,
    Adventurous,
    Counselor,
    Mediator,
    Entertainer,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 8] = [
        PersonalityType::Analytical,
        PersonalityType::Creative,
        PersonalityType::Leader,
        PersonalityType::Supportive,
        PersonalityType::Adventurous,
        PersonalityType::Counselor,
        PersonalityType::Mediator,
        PersonalityType::Entertainer,
    ];

    /// Parse a raw tag from the document store.
    ///
    /// Unknown or empty tags normalize to `None` instead of failing
    /// deserialization: an unrecognized type means the factor is simply
    /// absent for scoring.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "ANALYTICAL" => Some(PersonalityType::Analytical),
            "CREATIVE" => Some(PersonalityType::Creative),
            "LEADER" => Some(PersonalityType::Leader),
            "SUPPORTIVE" => Some(PersonalityType::Supportive),
            "ADVENTUROUS" => Some(PersonalityType::Adventurous),
            "COUNSELOR" => Some(PersonalityType::Counselor),
            "MEDIATOR" => Some(PersonalityType::Mediator),
            "ENTERTAINER" => Some(PersonalityType::Entertainer),
            _ => None,
        }
    }

    /// Four-letter dichotomy code backing the graded similarity.
    pub fn code(self) -> &'static str {
        match self {
            PersonalityType::Analytical => "INTJ",
            PersonalityType::Creative => "ENFP",
            PersonalityType::Leader => "ENTJ",
            PersonalityType::Supportive => "ISFJ",
            PersonalityType::Adventurous => "ESTP",
            PersonalityType::Counselor => "INFJ",
            PersonalityType::Mediator => "INFP",
            PersonalityType::Entertainer => "ESFP",
        }
    }
}

/// Time-slot tags a user can mark themselves available for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvailabilitySlot {
    Morning,
    Afternoon,
    Evening,
    Night,
    Weekdays,
    Weekends,
    Flexible,
}

impl AvailabilitySlot {
    /// Parse a raw slot tag; unknown tags are dropped at the boundary.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(AvailabilitySlot::Morning),
            "afternoon" => Some(AvailabilitySlot::Afternoon),
            "evening" => Some(AvailabilitySlot::Evening),
            "night" => Some(AvailabilitySlot::Night),
            "weekdays" => Some(AvailabilitySlot::Weekdays),
            "weekends" => Some(AvailabilitySlot::Weekends),
            "flexible" => Some(AvailabilitySlot::Flexible),
            _ => None,
        }
    }
}

/// User profile as published in the external document store.
///
/// Read-only to this service. Enum-backed fields are normalized on the way
/// in: an unrecognized personality type becomes `None`, unrecognized
/// availability tags are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(
        rename = "personalityType",
        default,
        deserialize_with = "de_personality_type"
    )]
    pub personality_type: Option<PersonalityType>,
    #[serde(default, deserialize_with = "de_availability")]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "isAvailableForRent", default)]
    pub is_available_for_rent: bool,
    #[serde(rename = "hourlyRate", default)]
    pub hourly_rate: f64,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "instagramHandle", default)]
    pub instagram_handle: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn de_personality_type<'de, D>(deserializer: D) -> Result<Option<PersonalityType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(PersonalityType::parse))
}

fn de_availability<'de, D>(deserializer: D) -> Result<Vec<AvailabilitySlot>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|tag| AvailabilitySlot::parse(tag))
        .collect())
}

/// Lifecycle state of a persisted match. Write-once for this service:
/// records are created as `Pending` and never transitioned here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
        }
    }
}

/// Persisted match between a subject and a candidate.
///
/// At most one record exists per ordered `(subject_id, candidate_id)` pair;
/// the store enforces this, so re-detection is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: f64,
    #[serde(rename = "matchedAt")]
    pub matched_at: DateTime<Utc>,
    pub status: MatchStatus,
}

impl MatchRecord {
    pub fn pending(subject_id: &str, candidate_id: &str, score: f64) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            candidate_id: candidate_id.to_string(),
            score,
            matched_at: Utc::now(),
            status: MatchStatus::Pending,
        }
    }
}

/// Score breakdown for one profile pair.
///
/// `total` is the rounded compatibility score. Per-factor contributions are
/// kept for explainability; `None` means the factor was excluded because at
/// least one side had no data for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScore {
    pub total: f64,
    pub personality: Option<f64>,
    pub availability: Option<f64>,
    pub interests: Option<f64>,
}

impl MatchScore {
    pub fn factor_count(&self) -> usize {
        [
            self.personality.is_some(),
            self.availability.is_some(),
            self.interests.is_some(),
        ]
        .iter()
        .filter(|included| **included)
        .count()
    }
}

/// Candidate that cleared the detection threshold in one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedMatch {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub score: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub personality: f64,
    pub availability: f64,
    pub interests: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            personality: 30.0,
            availability: 30.0,
            interests: 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_parse_known_tags() {
        for kind in PersonalityType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let tag = json.trim_matches('"');
            assert_eq!(PersonalityType::parse(tag), Some(kind));
        }
    }

    #[test]
    fn test_personality_parse_unknown_is_none() {
        assert_eq!(PersonalityType::parse(""), None);
        assert_eq!(PersonalityType::parse("WIZARD"), None);
        assert_eq!(PersonalityType::parse("  "), None);
    }

    #[test]
    fn test_personality_codes_are_distinct() {
        for a in PersonalityType::ALL {
            assert_eq!(a.code().len(), 4);
            for b in PersonalityType::ALL {
                if a != b {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }

    #[test]
    fn test_profile_normalizes_unknown_enum_values() {
        let json = serde_json::json!({
            "personalityType": "SOMETHING_NEW",
            "availability": ["Morning", "Teatime", "Evening"],
            "interests": ["chess"],
            "displayName": "Alex",
        });

        let profile: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.personality_type, None);
        assert_eq!(
            profile.availability,
            vec![AvailabilitySlot::Morning, AvailabilitySlot::Evening]
        );
        assert_eq!(profile.interests, vec!["chess"]);
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let profile: Profile = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(profile.personality_type, None);
        assert!(profile.availability.is_empty());
        assert!(profile.interests.is_empty());
        assert!(!profile.is_available_for_rent);
        assert_eq!(profile.hourly_rate, 0.0);
    }

    #[test]
    fn test_match_record_pending() {
        let record = MatchRecord::pending("a", "b", 73.0);
        assert_eq!(record.subject_id, "a");
        assert_eq!(record.candidate_id, "b");
        assert_eq!(record.status, MatchStatus::Pending);
        assert_eq!(record.status.as_str(), "pending");
    }
}
