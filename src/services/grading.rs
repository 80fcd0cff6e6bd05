use std::collections::HashMap;

use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Attempt, Question};
use crate::db::types::AttemptStatus;
use crate::repositories::{activities, answers, attempts};
use crate::schemas::grading::GradeEntry;

use super::error::EngineError;
use super::scoring;

/// Applies a teacher's grade batch to a SUBMITTED attempt. All-or-nothing:
/// any invalid entry rolls the whole batch back. The attempt row is locked
/// for the duration so concurrent batches serialize and the aggregation
/// always sees the writes it reacts to.
pub(crate) async fn grade_attempt(
    pool: &PgPool,
    grader_id: &str,
    attempt_id: &str,
    grades: &[GradeEntry],
) -> Result<Attempt, EngineError> {
    let mut tx = pool.begin().await?;

    let attempt = attempts::lock_by_id(&mut *tx, attempt_id)
        .await?
        .ok_or_else(|| EngineError::not_found("attempt"))?;
    if !attempt.status.can_transition_to(AttemptStatus::Graded) {
        return Err(EngineError::InvalidAttemptState {
            expected: AttemptStatus::Submitted,
            actual: attempt.status,
        });
    }

    // Stay on the transaction connection while the attempt row is locked.
    let activity = activities::find_by_id(&mut *tx, &attempt.activity_id)
        .await?
        .ok_or_else(|| EngineError::not_found("activity"))?;
    let questions = activities::list_questions(&mut *tx, &attempt.activity_id).await?;
    let by_id: HashMap<&str, &Question> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let now = primitive_now_utc();
    for entry in grades {
        let question = by_id.get(entry.question_id.as_str()).copied().ok_or_else(|| {
            EngineError::UnknownQuestion {
                question_id: entry.question_id.clone(),
            }
        })?;
        if entry.points_awarded < 0 || entry.points_awarded > question.points {
            return Err(EngineError::GradeOutOfRange {
                question_id: question.id.clone(),
                points_awarded: entry.points_awarded,
                max_points: question.points,
            });
        }

        let is_correct = entry.points_awarded == question.points;
        let updated = answers::apply_grade(
            &mut *tx,
            attempt_id,
            &question.id,
            entry.points_awarded,
            is_correct,
            entry.feedback.as_deref(),
            grader_id,
            now,
        )
        .await?;
        // The question belongs to the activity but the attempt has no answer
        // row for it, which the submit flow rules out.
        if updated == 0 {
            return Err(EngineError::UnknownQuestion {
                question_id: question.id.clone(),
            });
        }
    }

    scoring::refresh(&mut *tx, attempt_id, attempt.max_score, activity.score_weight, now).await?;
    tx.commit().await?;

    attempts::find_by_id(pool, attempt_id)
        .await?
        .ok_or_else(|| EngineError::not_found("attempt"))
}
