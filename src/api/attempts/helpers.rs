use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::db::models::{Attempt, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::attempt::{AnswerResponse, AttemptDetailResponse};

pub(super) async fn fetch_attempt(pool: &PgPool, attempt_id: &str) -> Result<Attempt, ApiError> {
    let attempt = repositories::attempts::find_by_id(pool, attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt"))?;

    attempt.ok_or_else(|| ApiError::NotFound("Attempt not found".to_string()))
}

/// Students only see their own attempts; any teacher may review any attempt.
pub(super) fn require_view_access(user: &User, attempt: &Attempt) -> Result<(), ApiError> {
    match user.role {
        UserRole::Teacher | UserRole::Methodist => Ok(()),
        UserRole::Student if attempt.student_id == user.id => Ok(()),
        UserRole::Student => Err(ApiError::NotFound("Attempt not found".to_string())),
    }
}

pub(super) async fn attempt_detail(
    pool: &PgPool,
    attempt: Attempt,
) -> Result<AttemptDetailResponse, ApiError> {
    let answers = repositories::answers::list_with_questions(pool, &attempt.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answers"))?;

    Ok(AttemptDetailResponse {
        attempt: attempt.into(),
        answers: answers.into_iter().map(AnswerResponse::from).collect(),
    })
}
