use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Where a submission came from. Stored as its lowercase tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionSource {
    #[serde(rename = "website")]
    Website,
    #[serde(rename = "jotform_webhook")]
    JotformWebhook,
    #[serde(rename = "debug-test")]
    DebugTest,
    #[serde(rename = "test")]
    Test,
}

impl SubmissionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionSource::Website => "website",
            SubmissionSource::JotformWebhook => "jotform_webhook",
            SubmissionSource::DebugTest => "debug-test",
            SubmissionSource::Test => "test",
        }
    }
}

impl fmt::Display for SubmissionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown submission source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for SubmissionSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(SubmissionSource::Website),
            "jotform_webhook" => Ok(SubmissionSource::JotformWebhook),
            "debug-test" => Ok(SubmissionSource::DebugTest),
            "test" => Ok(SubmissionSource::Test),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// One stored feedback record. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FeedbackSubmission {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub answers: FeedbackAnswers,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub source: SubmissionSource,
}

impl FeedbackSubmission {
    /// Stamps server-side identity and provenance onto client answers.
    pub fn new(answers: FeedbackAnswers, source: SubmissionSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            answers,
            submitted_at: OffsetDateTime::now_utc(),
            source,
        }
    }
}

/// Everything a respondent can fill in.
///
/// Every field has a default so partial payloads (the form-builder webhook in
/// particular) deserialize cleanly: text defaults to `""`, sequences to `[]`,
/// ratings to absent. Keys are accepted in snake_case or camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FeedbackAnswers {
    #[serde(default, alias = "firstName", deserialize_with = "text")]
    pub first_name: String,
    #[serde(default, alias = "lastName", deserialize_with = "text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "text")]
    pub email: String,

    // profile
    #[serde(default, deserialize_with = "text")]
    pub age: String,
    #[serde(default, deserialize_with = "text")]
    pub phone: String,
    #[serde(default, deserialize_with = "text")]
    pub city: String,
    #[serde(default, deserialize_with = "text")]
    pub state: String,
    #[serde(default, deserialize_with = "text")]
    pub instagram: String,

    // cycle
    #[serde(default, alias = "cycleLength", deserialize_with = "text")]
    pub cycle_length: String,
    #[serde(default, alias = "lastPeriodDate", deserialize_with = "text")]
    pub last_period_date: String,
    #[serde(default, alias = "periodRegularity", deserialize_with = "text")]
    pub period_regularity: String,
    #[serde(default, alias = "cyclePhase", deserialize_with = "text")]
    pub cycle_phase: String,
    #[serde(default, alias = "restingHeartRate", deserialize_with = "text")]
    pub resting_heart_rate: String,
    #[serde(default, alias = "currentMedications", deserialize_with = "text")]
    pub current_medications: String,
    #[serde(default, alias = "healthConditions", deserialize_with = "text")]
    pub health_conditions: String,

    // usage
    #[serde(default, alias = "supplementStartDate", deserialize_with = "text")]
    pub supplement_start_date: String,
    #[serde(default, alias = "daysUsed", deserialize_with = "text")]
    pub days_used: String,
    #[serde(default, alias = "usageFrequency", deserialize_with = "text")]
    pub usage_frequency: String,
    #[serde(default, alias = "timeOfDay", deserialize_with = "text")]
    pub time_of_day: String,

    // ratings
    #[serde(default, alias = "overallSatisfaction", deserialize_with = "rating")]
    pub overall_satisfaction: Option<i32>,
    #[serde(default, deserialize_with = "rating")]
    pub taste: Option<i32>,
    #[serde(default, deserialize_with = "rating")]
    pub value: Option<i32>,
    #[serde(default, deserialize_with = "rating")]
    pub packaging: Option<i32>,
    #[serde(default, deserialize_with = "rating")]
    pub convenience: Option<i32>,

    // experience
    #[serde(default, alias = "benefitsExperienced", deserialize_with = "text_seq")]
    pub benefits_experienced: Vec<String>,
    #[serde(default, alias = "energyLevel", deserialize_with = "text")]
    pub energy_level: String,
    #[serde(default, alias = "moodChanges", deserialize_with = "text_seq")]
    pub mood_changes: Vec<String>,
    #[serde(default, alias = "sleepQuality", deserialize_with = "text")]
    pub sleep_quality: String,
    #[serde(default, alias = "crampRelief", deserialize_with = "text")]
    pub cramp_relief: String,
    #[serde(default, alias = "bloatingRelief", deserialize_with = "text")]
    pub bloating_relief: String,
    #[serde(default, alias = "sideEffects", deserialize_with = "text")]
    pub side_effects: String,
    #[serde(default, alias = "sideEffectDetails", deserialize_with = "text")]
    pub side_effect_details: String,
    #[serde(default, alias = "lifestyleImpact", deserialize_with = "text_seq")]
    pub lifestyle_impact: Vec<String>,

    // opinion
    #[serde(default, alias = "favoriteAspect", deserialize_with = "text")]
    pub favorite_aspect: String,
    #[serde(default, alias = "leastFavoriteAspect", deserialize_with = "text")]
    pub least_favorite_aspect: String,
    #[serde(default, alias = "improvementSuggestions", deserialize_with = "text")]
    pub improvement_suggestions: String,
    #[serde(default, alias = "wouldRecommend", deserialize_with = "text")]
    pub would_recommend: String,
    #[serde(default, alias = "recommendationReason", deserialize_with = "text")]
    pub recommendation_reason: String,
    #[serde(default, alias = "purchaseIntent", deserialize_with = "text")]
    pub purchase_intent: String,
    #[serde(default, alias = "priceWillingness", deserialize_with = "text")]
    pub price_willingness: String,
    #[serde(default, alias = "testimonialConsent", deserialize_with = "text")]
    pub testimonial_consent: String,
    #[serde(default, alias = "finalThoughts", deserialize_with = "text")]
    pub final_thoughts: String,
}

impl FeedbackAnswers {
    /// Names of the required contact fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn rating<'de, D>(d: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    })
}

fn text_seq<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_payload_takes_defaults() {
        let answers: FeedbackAnswers = serde_json::from_value(json!({
            "firstName": "Ana",
            "email": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Ana");
        assert_eq!(answers.last_name, "");
        assert!(answers.benefits_experienced.is_empty());
        assert_eq!(answers.taste, None);
    }

    #[test]
    fn ratings_accept_numbers_and_numeric_strings() {
        let answers: FeedbackAnswers = serde_json::from_value(json!({
            "overall_satisfaction": 5,
            "taste": "4",
            "value": "",
            "packaging": "great",
            "convenience": null
        }))
        .unwrap();
        assert_eq!(answers.overall_satisfaction, Some(5));
        assert_eq!(answers.taste, Some(4));
        assert_eq!(answers.value, None);
        assert_eq!(answers.packaging, None);
        assert_eq!(answers.convenience, None);
    }

    #[test]
    fn sequences_accept_arrays_or_comma_strings() {
        let answers: FeedbackAnswers = serde_json::from_value(json!({
            "benefits_experienced": ["Less cramping", "Better sleep"],
            "lifestyleImpact": "Work, Exercise , ",
        }))
        .unwrap();
        assert_eq!(answers.benefits_experienced, vec!["Less cramping", "Better sleep"]);
        assert_eq!(answers.lifestyle_impact, vec!["Work", "Exercise"]);
    }

    #[test]
    fn numeric_text_fields_are_stringified() {
        let answers: FeedbackAnswers =
            serde_json::from_value(json!({ "age": 29, "cycle_length": 28 })).unwrap();
        assert_eq!(answers.age, "29");
        assert_eq!(answers.cycle_length, "28");
    }

    #[test]
    fn missing_required_reports_blank_contact_fields() {
        let answers = FeedbackAnswers {
            first_name: "Ana".into(),
            last_name: "  ".into(),
            ..Default::default()
        };
        assert_eq!(answers.missing_required(), vec!["last_name", "email"]);
    }

    #[test]
    fn client_supplied_provenance_is_ignored() {
        let answers: FeedbackAnswers = serde_json::from_value(json!({
            "id": "not-a-uuid",
            "source": "admin",
            "submitted_at": "1999-01-01T00:00:00Z",
            "first_name": "Ana"
        }))
        .unwrap();
        let record = FeedbackSubmission::new(answers, SubmissionSource::Website);
        assert_eq!(record.source, SubmissionSource::Website);
        assert_ne!(record.submitted_at.year(), 1999);
    }

    #[test]
    fn submission_serializes_flat_with_source_tag() {
        let record = FeedbackSubmission::new(FeedbackAnswers::default(), SubmissionSource::DebugTest);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"], "debug-test");
        assert!(json.get("answers").is_none());
        assert!(json.get("first_name").is_some());

        let back: FeedbackSubmission = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.answers, record.answers);
        assert_eq!(back.source, record.source);
    }

    #[test]
    fn source_parses_known_tags_only() {
        assert_eq!("jotform_webhook".parse::<SubmissionSource>().unwrap(), SubmissionSource::JotformWebhook);
        assert!("admin".parse::<SubmissionSource>().is_err());
    }
}
