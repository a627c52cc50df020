use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::feedback::{FeedbackAnswers, FeedbackSubmission};

pub const RECENT_LIMIT: usize = 10;

/// Dashboard aggregates. Zeroed, never an error, when there is no data.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_submissions: u64,
    pub average_satisfaction: f64,
    pub average_taste: f64,
    pub average_value: f64,
    pub average_packaging: f64,
    pub average_convenience: f64,
    /// Whole percent of records whose recommendation text reads as a yes.
    pub recommendation_rate: f64,
    pub recent_submissions: Vec<FeedbackSubmission>,
    pub submissions: Vec<FeedbackSubmission>,
}

/// Free-text heuristic over `would_recommend`.
pub fn recommends(answer: &str) -> bool {
    lazy_static! {
        static ref YES_RE: Regex = Regex::new(r"(?i)definitely|yes").unwrap();
    }
    YES_RE.is_match(answer)
}

/// Aggregates over `records` in any order; `submissions` comes back newest first.
pub fn summarize(mut records: Vec<FeedbackSubmission>) -> AnalyticsSummary {
    if records.is_empty() {
        return AnalyticsSummary::default();
    }
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let total = records.len();
    let recommending = records
        .iter()
        .filter(|r| recommends(&r.answers.would_recommend))
        .count();

    AnalyticsSummary {
        total_submissions: total as u64,
        average_satisfaction: average(&records, |a| a.overall_satisfaction),
        average_taste: average(&records, |a| a.taste),
        average_value: average(&records, |a| a.value),
        average_packaging: average(&records, |a| a.packaging),
        average_convenience: average(&records, |a| a.convenience),
        recommendation_rate: (recommending as f64 * 100.0 / total as f64).round(),
        recent_submissions: records.iter().take(RECENT_LIMIT).cloned().collect(),
        submissions: records,
    }
}

// Mean over records that carry the rating, one decimal place.
fn average<F>(records: &[FeedbackSubmission], rating: F) -> f64
where
    F: Fn(&FeedbackAnswers) -> Option<i32>,
{
    let (sum, n) = records
        .iter()
        .filter_map(|r| rating(&r.answers))
        .fold((0i64, 0u32), |(sum, n), v| (sum + i64::from(v), n + 1));
    if n == 0 {
        return 0.0;
    }
    round1(sum as f64 / f64::from(n))
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
