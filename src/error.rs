use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Caller must fix the request; nothing was written.
    #[error("{message}")]
    Validation {
        message: String,
        missing_fields: Vec<&'static str>,
    },

    /// Store unreachable, misconfigured or refusing; worth retrying later.
    #[error("Storage unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(format!("Invalid JSON payload: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation {
                message,
                missing_fields,
            } => {
                warn!(%message, ?missing_fields, "request rejected");
                if missing_fields.is_empty() {
                    json!({ "success": false, "error": message })
                } else {
                    json!({ "success": false, "error": message, "missingFields": missing_fields })
                }
            }
            AppError::Store(e) => {
                error!(error = %e, "store call failed");
                json!({ "success": false, "error": "Storage unavailable", "details": e.to_string() })
            }
            AppError::Internal(e) => {
                error!(error = ?e, "unexpected failure");
                json!({ "success": false, "error": "Internal server error", "details": format!("{e:#}") })
            }
        };
        (status, Json(body)).into_response()
    }
}
