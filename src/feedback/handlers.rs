use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{StoreStatus, StoreStatusResponse, SubmitFeedbackResponse, WebhookResponse},
    model::{FeedbackAnswers, FeedbackSubmission, SubmissionSource},
    webhook,
};
use crate::{error::AppError, state::AppState};

pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-feedback", post(submit_feedback))
        .route("/jotform-webhook", post(jotform_webhook))
}

pub fn debug_routes() -> Router<AppState> {
    Router::new()
        .route("/debug/test-submission", post(debug_test_submission))
        .route("/debug/store-status", get(store_status))
}

/// POST /api/submit-feedback: the site form.
#[instrument(skip(state, payload))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackAnswers>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    let Json(answers) = payload?;

    let missing = answers.missing_required();
    if !missing.is_empty() {
        return Err(AppError::Validation {
            message: "First name, last name, and email are required".into(),
            missing_fields: missing,
        });
    }

    store_and_echo(&state, answers, SubmissionSource::Website).await
}

/// POST /api/jotform-webhook: the form builder, no required fields.
#[instrument(skip(state, payload))]
pub async fn jotform_webhook(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WebhookResponse>, AppError> {
    let Json(body) = payload?;
    let answers = webhook::parse_payload(body)?;

    let record = state
        .store
        .insert(FeedbackSubmission::new(answers, SubmissionSource::JotformWebhook))
        .await?;

    info!(id = %record.id, "webhook submission stored");
    Ok(Json(WebhookResponse {
        success: true,
        submission_id: record.id,
    }))
}

/// POST /api/debug/test-submission: stores a canned record.
#[instrument(skip(state))]
pub async fn debug_test_submission(
    State(state): State<AppState>,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    store_and_echo(&state, sample_answers(), SubmissionSource::DebugTest).await
}

/// GET /api/debug/store-status: backend name, tier and whether a count succeeds.
#[instrument(skip(state))]
pub async fn store_status(State(state): State<AppState>) -> Json<StoreStatusResponse> {
    let (total_records, error) = match state.store.count().await {
        Ok(n) => (Some(n), None),
        Err(e) => {
            warn!(error = %e, "store status probe failed");
            (None, Some(e.to_string()))
        }
    };

    Json(StoreStatusResponse {
        success: true,
        data: StoreStatus {
            backend: state.store.backend(),
            tier: state.store.tier(),
            reachable: error.is_none(),
            total_records,
            error,
        },
    })
}

async fn store_and_echo(
    state: &AppState,
    answers: FeedbackAnswers,
    source: SubmissionSource,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    let record = state
        .store
        .insert(FeedbackSubmission::new(answers, source))
        .await?;

    // The row is already written; a failed count must not invite a retry.
    let total = match state.store.count().await {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(error = %e, id = %record.id, "count after insert failed");
            None
        }
    };

    info!(id = %record.id, %source, total = ?total, "feedback stored");
    Ok(Json(SubmitFeedbackResponse {
        success: true,
        message: "Feedback submitted successfully".into(),
        data: record,
        total_submissions: total,
    }))
}

/// Fixed answers used by the debug harness and the admin `seed` command.
pub fn sample_answers() -> FeedbackAnswers {
    FeedbackAnswers {
        first_name: "Test".into(),
        last_name: "User".into(),
        email: "test@example.com".into(),
        age: "28".into(),
        city: "Austin".into(),
        state: "TX".into(),
        cycle_length: "28".into(),
        period_regularity: "Regular".into(),
        usage_frequency: "Daily".into(),
        overall_satisfaction: Some(5),
        taste: Some(4),
        value: Some(4),
        packaging: Some(5),
        convenience: Some(4),
        benefits_experienced: vec!["Reduced cramps".into(), "Better mood".into()],
        energy_level: "Improved".into(),
        lifestyle_impact: vec!["Work".into(), "Exercise".into()],
        would_recommend: "Definitely".into(),
        final_thoughts: "Sample submission".into(),
        ..Default::default()
    }
}
