use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ProgressOverviewResponse {
    pub(crate) course_id: String,
    pub(crate) required_tests: i64,
    pub(crate) completed_tests: i64,
    pub(crate) percent: f64,
    pub(crate) completed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicStatsResponse {
    pub(crate) topic: String,
    pub(crate) attempt_count: i64,
    pub(crate) graded_count: i64,
    pub(crate) average_best_percent: Option<f64>,
}
