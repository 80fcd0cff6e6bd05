use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Attempt;
use crate::db::types::AttemptStatus;
use crate::repositories::{activities, answers, attempts, enrollments};
use crate::schemas::attempt::AnswerSubmission;

use super::answers::{validate_answer_set, AnswerValue};
use super::autograde;
use super::error::EngineError;
use super::policy::AttemptPolicy;
use super::scoring;

#[derive(Debug)]
pub(crate) enum StartOutcome {
    Created(Attempt),
    /// An open attempt already existed; starting again hands it back.
    Resumed(Attempt),
}

pub(crate) async fn start_attempt(
    pool: &PgPool,
    max_attempts: u32,
    student_id: &str,
    activity_id: &str,
) -> Result<StartOutcome, EngineError> {
    let activity = activities::find_by_id(pool, activity_id)
        .await?
        .filter(|a| a.is_published)
        .ok_or_else(|| EngineError::not_found("activity"))?;

    if !enrollments::is_enrolled_in_course(pool, student_id, &activity.course_id).await? {
        return Err(EngineError::ActivityNotOpen);
    }

    if let Some(existing) = attempts::find_in_progress(pool, student_id, activity_id).await? {
        return Ok(StartOutcome::Resumed(existing));
    }

    let mut tx = pool.begin().await?;

    let history = attempts::history(&mut *tx, student_id, activity_id).await?;
    let policy = AttemptPolicy::for_activity(max_attempts, activity.activity_type);
    policy.check_start(history.finished_count, history.graded_count > 0)?;

    let max_score = activities::total_points(&mut *tx, activity_id).await?;
    let now = primitive_now_utc();
    let id = Uuid::new_v4().to_string();
    let created = attempts::create(
        &mut *tx,
        attempts::NewAttempt {
            id: &id,
            activity_id,
            student_id,
            attempt_number: history.highest_number + 1,
            max_score: max_score as i32,
            started_at: now,
        },
    )
    .await;

    match created {
        Ok(attempt) => {
            tx.commit().await?;
            Ok(StartOutcome::Created(attempt))
        }
        Err(err) if is_unique_violation(&err) => {
            // Lost the race on the one-open-attempt index; the winner's row
            // is what the caller should resume.
            tx.rollback().await?;
            match attempts::find_in_progress(pool, student_id, activity_id).await? {
                Some(existing) => Ok(StartOutcome::Resumed(existing)),
                None => Err(EngineError::AttemptAlreadyInProgress),
            }
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn submit_attempt(
    pool: &PgPool,
    attempt: &Attempt,
    submitted: &[AnswerSubmission],
) -> Result<Attempt, EngineError> {
    if !attempt.status.can_transition_to(AttemptStatus::Submitted) {
        return Err(EngineError::InvalidAttemptState {
            expected: AttemptStatus::InProgress,
            actual: attempt.status,
        });
    }

    let activity = activities::find_by_id(pool, &attempt.activity_id)
        .await?
        .ok_or_else(|| EngineError::not_found("activity"))?;
    let questions = activities::list_questions(pool, &attempt.activity_id).await?;
    let validated = validate_answer_set(&questions, submitted)?;

    let mut tx = pool.begin().await?;
    let now = primitive_now_utc();

    if !attempts::mark_submitted(&mut *tx, &attempt.id, now).await? {
        tx.rollback().await?;
        // Lost the claim: report the state the winner left behind. The row
        // can also be gone entirely if the attempt was deleted underneath us.
        return match attempts::find_by_id(pool, &attempt.id).await? {
            Some(current) => Err(EngineError::InvalidAttemptState {
                expected: AttemptStatus::InProgress,
                actual: current.status,
            }),
            None => Err(EngineError::not_found("attempt")),
        };
    }

    for (question, value) in &validated {
        let kind = question
            .kind()
            .ok_or_else(|| EngineError::CorruptQuestion(question.id.clone()))?;
        let result = autograde::grade_answer(&kind, question.points, value);

        let (selected_option, text_answer) = match value {
            AnswerValue::Choice(selected) => (Some(*selected), None),
            AnswerValue::Text(text) => (None, Some(text.as_str())),
        };
        let answer_id = Uuid::new_v4().to_string();
        answers::insert(
            &mut *tx,
            answers::NewAnswer {
                id: &answer_id,
                attempt_id: &attempt.id,
                question_id: &question.id,
                selected_option,
                text_answer,
                is_correct: result.is_correct,
                points_awarded: result.points_awarded,
                created_at: now,
            },
        )
        .await?;
    }

    scoring::refresh(&mut *tx, &attempt.id, attempt.max_score, activity.score_weight, now).await?;
    tx.commit().await?;

    attempts::find_by_id(pool, &attempt.id)
        .await?
        .ok_or_else(|| EngineError::not_found("attempt"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::{ActivityType, UserRole};
    use crate::test_support;

    #[tokio::test]
    async fn submitting_a_deleted_attempt_is_not_found() {
        let ctx = test_support::setup_test_context().await;
        let pool = ctx.state.db();

        let student = test_support::insert_user(pool, "Student User", UserRole::Student).await;
        let course_id = test_support::insert_course(pool, "Math 101").await;
        let class_id = test_support::insert_class(pool, &course_id, "7A").await;
        test_support::enroll(pool, &class_id, &student.id).await;
        let activity = test_support::insert_activity(
            pool,
            &course_id,
            "Quiz",
            ActivityType::HomeworkTest,
            "fractions",
            None,
        )
        .await;
        let question =
            test_support::insert_single_choice_question(pool, &activity.id, 0, 2, &["a", "b"], 1)
                .await;

        let attempt = match start_attempt(pool, 2, &student.id, &activity.id)
            .await
            .expect("start attempt")
        {
            StartOutcome::Created(attempt) | StartOutcome::Resumed(attempt) => attempt,
        };

        sqlx::query("DELETE FROM attempts WHERE id = $1")
            .bind(&attempt.id)
            .execute(pool)
            .await
            .expect("delete attempt");

        let submission = AnswerSubmission {
            question_id: question.id.clone(),
            selected_option: Some(1),
            text_answer: None,
        };
        let err = submit_attempt(pool, &attempt, &[submission])
            .await
            .expect_err("submit with a stale attempt");
        assert!(matches!(err, EngineError::NotFound { entity: "attempt" }), "got {err:?}");
    }
}
