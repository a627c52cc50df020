use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    analytics::{self, AnalyticsSummary},
    export,
};
use crate::{error::AppError, feedback::FeedbackSubmission, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(get_analytics))
        .route("/export-feedback", get(export_feedback))
        .route("/export-feedback-fallback", get(export_feedback_fallback))
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub data: AnalyticsSummary,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJsonResponse {
    pub success: bool,
    pub data: Vec<FeedbackSubmission>,
    pub total_records: usize,
}

/// GET /api/analytics. Never fails; an unreadable store reads as empty.
#[instrument(skip(state))]
pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let records = match state.store.list_all().await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, backend = state.store.backend(), "analytics falling back to empty data");
            Vec::new()
        }
    };

    Json(AnalyticsResponse {
        success: true,
        data: analytics::summarize(records),
    })
}

/// GET /api/export-feedback?format=csv|json
#[instrument(skip(state))]
pub async fn export_feedback(
    State(state): State<AppState>,
    Query(q): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let records = state.store.list_all().await?;
    render(records, q.format)
}

/// GET /api/export-feedback-fallback: primary store first, then the local file.
#[instrument(skip(state))]
pub async fn export_feedback_fallback(
    State(state): State<AppState>,
    Query(q): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let records = match state.store.list_all().await {
        Ok(rows) => rows,
        Err(primary) => {
            warn!(error = %primary, "primary store failed; reading fallback file");
            state.fallback_store.list_all().await?
        }
    };
    render(records, q.format)
}

fn render(records: Vec<FeedbackSubmission>, format: ExportFormat) -> Result<Response, AppError> {
    info!(rows = records.len(), ?format, "exporting feedback");
    match format {
        ExportFormat::Json => Ok(Json(ExportJsonResponse {
            success: true,
            total_records: records.len(),
            data: records,
        })
        .into_response()),
        ExportFormat::Csv => {
            let body = export::to_csv(&records)?;
            let filename = export::filename_for(OffsetDateTime::now_utc().date());
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}
