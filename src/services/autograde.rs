use crate::db::models::QuestionKind;

use super::answers::AnswerValue;

/// Outcome of auto-grading one answer. Open questions produce `None` in both
/// fields and wait for a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AutoGradeResult {
    pub(crate) is_correct: Option<bool>,
    pub(crate) points_awarded: Option<i32>,
}

/// Collapses runs of whitespace to single spaces and lowercases, so that
/// "  The  Answer " and "the answer" compare equal.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Auto-gradable questions score all-or-nothing: full points on a match,
/// zero otherwise.
pub(crate) fn grade_answer(kind: &QuestionKind, points: i32, value: &AnswerValue) -> AutoGradeResult {
    let correct = match (kind, value) {
        (QuestionKind::SingleChoice { correct_option, .. }, AnswerValue::Choice(selected)) => {
            selected == correct_option
        }
        (QuestionKind::TextExact { correct_text }, AnswerValue::Text(text)) => {
            normalize_text(text) == normalize_text(correct_text)
        }
        (QuestionKind::Open, _) => {
            return AutoGradeResult {
                is_correct: None,
                points_awarded: None,
            };
        }
        // Shape validation upstream makes a payload mismatch unreachable;
        // treat it as wrong rather than panic if it ever slips through.
        _ => false,
    };

    AutoGradeResult {
        is_correct: Some(correct),
        points_awarded: Some(if correct { points } else { 0 }),
    }
}
