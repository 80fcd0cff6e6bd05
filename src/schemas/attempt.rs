use serde::{Deserialize, Serialize};

pub(crate) use crate::core::time::format_primitive;
use crate::db::models::Attempt;
use crate::db::types::{AttemptStatus, QuestionType};
use crate::repositories::answers::AnswerWithQuestion;

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResponse {
    pub(crate) id: String,
    pub(crate) activity_id: String,
    pub(crate) student_id: String,
    pub(crate) attempt_number: i32,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) graded_at: Option<String>,
    pub(crate) score: Option<i32>,
    pub(crate) max_score: i32,
    pub(crate) weighted_score: Option<f64>,
    pub(crate) weighted_max_score: Option<f64>,
}

impl From<Attempt> for AttemptResponse {
    fn from(attempt: Attempt) -> Self {
        AttemptResponse {
            id: attempt.id,
            activity_id: attempt.activity_id,
            student_id: attempt.student_id,
            attempt_number: attempt.attempt_number,
            status: attempt.status,
            started_at: format_primitive(attempt.started_at),
            submitted_at: attempt.submitted_at.map(format_primitive),
            graded_at: attempt.graded_at.map(format_primitive),
            score: attempt.score,
            max_score: attempt.max_score,
            weighted_score: attempt.weighted_score,
            weighted_max_score: attempt.weighted_max_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StartAttemptResponse {
    /// True when an already-open attempt was handed back instead of a new one.
    pub(crate) resumed: bool,
    #[serde(flatten)]
    pub(crate) attempt: AttemptResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerResponse {
    pub(crate) question_id: String,
    pub(crate) question_type: QuestionType,
    pub(crate) points: i32,
    pub(crate) selected_option: Option<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) is_correct: Option<bool>,
    pub(crate) points_awarded: Option<i32>,
    pub(crate) feedback: Option<String>,
}

impl From<AnswerWithQuestion> for AnswerResponse {
    fn from(row: AnswerWithQuestion) -> Self {
        AnswerResponse {
            question_id: row.question_id,
            question_type: row.question_type,
            points: row.points,
            selected_option: row.selected_option,
            text_answer: row.text_answer,
            is_correct: row.is_correct,
            points_awarded: row.points_awarded,
            feedback: row.feedback,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptDetailResponse {
    #[serde(flatten)]
    pub(crate) attempt: AttemptResponse,
    pub(crate) answers: Vec<AnswerResponse>,
}

/// An empty answer list is legal: an activity without questions grades
/// immediately with a zero score.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAttemptRequest {
    pub(crate) answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnswerSubmission {
    pub(crate) question_id: String,
    pub(crate) selected_option: Option<i32>,
    pub(crate) text_answer: Option<String>,
}
