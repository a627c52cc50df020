pub mod dto;
pub mod handlers;
pub mod model;
mod webhook;

use crate::state::AppState;
use axum::Router;

pub use model::{FeedbackAnswers, FeedbackSubmission, SubmissionSource};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::ingest_routes())
        .merge(handlers::debug_routes())
}
