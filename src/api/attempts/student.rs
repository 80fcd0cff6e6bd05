use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::attempt::{
    AttemptDetailResponse, AttemptResponse, StartAttemptResponse, SubmitAttemptRequest,
};
use crate::services::attempts::{self, StartOutcome};

pub(super) async fn start_attempt(
    Path(activity_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StartAttemptResponse>, ApiError> {
    let max_attempts = state.settings().engine().max_attempts;
    let outcome =
        attempts::start_attempt(state.db(), max_attempts, &user.id, &activity_id).await?;

    let response = match outcome {
        StartOutcome::Created(attempt) => {
            StartAttemptResponse { resumed: false, attempt: attempt.into() }
        }
        StartOutcome::Resumed(attempt) => {
            StartAttemptResponse { resumed: true, attempt: attempt.into() }
        }
    };

    Ok(Json(response))
}

pub(super) async fn my_attempts(
    Path(activity_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AttemptResponse>>, ApiError> {
    let attempts =
        repositories::attempts::list_for_student_activity(state.db(), &user.id, &activity_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch attempts"))?;

    Ok(Json(attempts.into_iter().map(AttemptResponse::from).collect()))
}

pub(super) async fn get_attempt(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AttemptDetailResponse>, ApiError> {
    let attempt = super::helpers::fetch_attempt(state.db(), &attempt_id).await?;
    super::helpers::require_view_access(&user, &attempt)?;

    let detail = super::helpers::attempt_detail(state.db(), attempt).await?;
    Ok(Json(detail))
}

pub(super) async fn submit_attempt(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<Json<AttemptDetailResponse>, ApiError> {
    let attempt = super::helpers::fetch_attempt(state.db(), &attempt_id).await?;
    if attempt.student_id != user.id {
        return Err(ApiError::NotFound("Attempt not found".to_string()));
    }

    let submitted = attempts::submit_attempt(state.db(), &attempt, &payload.answers).await?;
    let detail = super::helpers::attempt_detail(state.db(), submitted).await?;
    Ok(Json(detail))
}
