pub(crate) mod helpers;
mod student;
mod teacher;

use axum::{routing::get, routing::post, routing::put, Router};
use serde::Deserialize;

use crate::core::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct PendingQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    pub(crate) activity_id: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

/// Routes mounted under `/activities`.
pub(crate) fn activity_router() -> Router<AppState> {
    Router::new()
        .route("/:activity_id/attempts", post(student::start_attempt))
        .route("/:activity_id/attempts/my", get(student::my_attempts))
}

/// Routes mounted under `/attempts`.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        // Teacher endpoints
        .route("/pending", get(teacher::pending_attempts))
        .route("/:attempt_id/grade", put(teacher::grade_attempt))
        // Shared / student endpoints
        .route("/:attempt_id", get(student::get_attempt))
        .route("/:attempt_id/submit", post(student::submit_attempt))
}

#[cfg(test)]
mod tests;
