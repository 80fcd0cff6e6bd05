use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{ActivityType, AttemptStatus, QuestionType, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Activity {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) activity_type: ActivityType,
    pub(crate) topic: String,
    pub(crate) deadline: Option<PrimitiveDateTime>,
    pub(crate) score_weight: Option<f64>,
    pub(crate) is_published: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) activity_id: String,
    pub(crate) order_index: i32,
    pub(crate) question_type: QuestionType,
    pub(crate) points: i32,
    pub(crate) options: Json<Vec<String>>,
    pub(crate) correct_option: Option<i32>,
    pub(crate) correct_text: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// The three question shapes share almost no fields, so grading code works
/// on this tagged view instead of the nullable row columns.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QuestionKind {
    SingleChoice { options: Vec<String>, correct_option: i32 },
    TextExact { correct_text: String },
    Open,
}

impl Question {
    /// Returns `None` when the row violates the shape of its own type tag
    /// (missing canonical answer, correct option outside the option list).
    pub(crate) fn kind(&self) -> Option<QuestionKind> {
        match self.question_type {
            QuestionType::SingleChoice => {
                let correct_option = self.correct_option?;
                let options = self.options.0.clone();
                if options.len() < 2 || correct_option < 1 || correct_option as usize > options.len()
                {
                    return None;
                }
                Some(QuestionKind::SingleChoice { options, correct_option })
            }
            QuestionType::Text => {
                let correct_text = self.correct_text.clone()?;
                if correct_text.trim().is_empty() {
                    return None;
                }
                Some(QuestionKind::TextExact { correct_text })
            }
            QuestionType::Open => Some(QuestionKind::Open),
        }
    }

    pub(crate) fn option_count(&self) -> usize {
        self.options.0.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Attempt {
    pub(crate) id: String,
    pub(crate) activity_id: String,
    pub(crate) student_id: String,
    pub(crate) attempt_number: i32,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
    pub(crate) score: Option<i32>,
    pub(crate) max_score: i32,
    pub(crate) weighted_score: Option<f64>,
    pub(crate) weighted_max_score: Option<f64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) id: String,
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) selected_option: Option<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) is_correct: Option<bool>,
    pub(crate) points_awarded: Option<i32>,
    pub(crate) feedback: Option<String>,
    pub(crate) graded_by: Option<String>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
}
