use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentTeacher;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::repositories::grading::{self, PendingFilter};
use crate::schemas::attempt::AttemptDetailResponse;
use crate::schemas::grading::{GradeAttemptRequest, PendingAttemptResponse};
use crate::services;

use super::PendingQuery;

pub(super) async fn pending_attempts(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<PaginatedResponse<PendingAttemptResponse>>, ApiError> {
    let skip = query.skip.max(0);
    let limit = query.limit.clamp(1, 500);
    let filter = PendingFilter {
        course_id: query.course_id,
        class_id: query.class_id,
        activity_id: query.activity_id,
    };

    let rows = grading::list_pending(state.db(), &filter, limit, skip)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch pending attempts"))?;
    let total_count = grading::count_pending(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count pending attempts"))?;

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(PendingAttemptResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn grade_attempt(
    Path(attempt_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<GradeAttemptRequest>,
) -> Result<Json<AttemptDetailResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let graded =
        services::grading::grade_attempt(state.db(), &teacher.id, &attempt_id, &payload.grades)
            .await?;
    let detail = super::helpers::attempt_detail(state.db(), graded).await?;
    Ok(Json(detail))
}
