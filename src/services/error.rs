use crate::db::types::AttemptStatus;

#[derive(Debug, thiserror::Error)]
pub(crate) enum EngineError {
    #[error("an attempt for this activity is already in progress")]
    AttemptAlreadyInProgress,

    #[error("attempt limit of {max_attempts} reached for this activity")]
    AttemptLimitExceeded { max_attempts: u32 },

    #[error("activity is locked after a graded attempt")]
    ActivityLocked,

    #[error("attempt is {actual:?}, expected {expected:?}")]
    InvalidAttemptState {
        expected: AttemptStatus,
        actual: AttemptStatus,
    },

    #[error("question {question_id} does not belong to this attempt")]
    UnknownQuestion { question_id: String },

    #[error("{points_awarded} points for question {question_id} exceed the maximum of {max_points}")]
    GradeOutOfRange {
        question_id: String,
        points_awarded: i32,
        max_points: i32,
    },

    #[error("answers missing for {} question(s)", .0.len())]
    MissingAnswers(Vec<String>),

    #[error("invalid answer for question {question_id}: {message}")]
    InvalidAnswer {
        question_id: String,
        message: String,
    },

    #[error("activity is not open to this student")]
    ActivityNotOpen,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("question {0} has an inconsistent definition")]
    CorruptQuestion(String),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl EngineError {
    pub(crate) fn not_found(entity: &'static str) -> Self {
        EngineError::NotFound { entity }
    }
}
