pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use handlers::{clear_all, ClearOutcome};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
