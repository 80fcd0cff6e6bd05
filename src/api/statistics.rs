use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::statistics::{ProgressOverviewResponse, TopicStatsResponse};
use crate::services::progress;

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewQuery {
    pub(crate) course_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicsQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/topics", get(topics))
}

async fn overview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<ProgressOverviewResponse>, ApiError> {
    let view = progress::overview(state.db(), &user.id, &query.course_id).await?;
    Ok(Json(view))
}

async fn topics(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<Vec<TopicStatsResponse>>, ApiError> {
    let rows = progress::topics(state.db(), &user.id, query.course_id.as_deref()).await?;
    Ok(Json(rows))
}
