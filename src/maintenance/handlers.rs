use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{error::AppError, state::AppState, store::SubmissionStore};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/clear-feedback-data",
        get(count_feedback).delete(clear_feedback),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountData {
    pub total_records: u64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub data: CountData,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    pub records_before: u64,
    pub records_deleted: u64,
    pub remaining_records: u64,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub data: ClearOutcome,
}

/// Count, delete everything, count again. Not atomic: a concurrent insert
/// between the calls shows up in `remaining_records`.
pub async fn clear_all(store: &dyn SubmissionStore) -> Result<ClearOutcome, AppError> {
    let records_before = store.count().await?;
    let records_deleted = store.delete_all().await?;
    let remaining_records = store.count().await?;

    if remaining_records > 0 {
        warn!(remaining_records, "rows remain after bulk delete");
    }
    info!(records_before, records_deleted, remaining_records, "feedback data cleared");

    Ok(ClearOutcome {
        records_before,
        records_deleted,
        remaining_records,
    })
}

/// GET /api/clear-feedback-data
#[instrument(skip(state))]
pub async fn count_feedback(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let total_records = state.store.count().await?;
    Ok(Json(CountResponse {
        success: true,
        data: CountData { total_records },
    }))
}

/// DELETE /api/clear-feedback-data
#[instrument(skip(state))]
pub async fn clear_feedback(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    let outcome = clear_all(state.store.as_ref()).await?;
    Ok(Json(ClearResponse {
        success: true,
        message: format!("Deleted {} feedback records", outcome.records_deleted),
        data: outcome,
    }))
}
