use serde::{Deserialize, Serialize};
use validator::Validate;

pub(crate) use crate::core::time::format_primitive;
use crate::repositories::grading::PendingAttemptRow;

#[derive(Debug, Serialize)]
pub(crate) struct PendingAttemptResponse {
    pub(crate) attempt_id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) activity_id: String,
    pub(crate) activity_title: String,
    pub(crate) course_id: String,
    pub(crate) class_id: Option<String>,
    pub(crate) class_title: Option<String>,
    pub(crate) submitted_at: Option<String>,
    pub(crate) ungraded_count: i64,
}

impl From<PendingAttemptRow> for PendingAttemptResponse {
    fn from(row: PendingAttemptRow) -> Self {
        PendingAttemptResponse {
            attempt_id: row.attempt_id,
            student_id: row.student_id,
            student_name: row.student_name,
            activity_id: row.activity_id,
            activity_title: row.activity_title,
            course_id: row.course_id,
            class_id: row.class_id,
            class_title: row.class_title,
            submitted_at: row.submitted_at.map(format_primitive),
            ungraded_count: row.ungraded_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GradeAttemptRequest {
    #[validate(length(min = 1, message = "grades must not be empty"), nested)]
    pub(crate) grades: Vec<GradeEntry>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub(crate) struct GradeEntry {
    pub(crate) question_id: String,
    #[validate(range(min = 0, message = "points_awarded must not be negative"))]
    pub(crate) points_awarded: i32,
    #[validate(length(max = 2000, message = "feedback is too long"))]
    pub(crate) feedback: Option<String>,
}
