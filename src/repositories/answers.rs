use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;

use crate::db::types::QuestionType;

pub(crate) struct NewAnswer<'a> {
    pub(crate) id: &'a str,
    pub(crate) attempt_id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) selected_option: Option<i32>,
    pub(crate) text_answer: Option<&'a str>,
    pub(crate) is_correct: Option<bool>,
    pub(crate) points_awarded: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AnswerTotals {
    pub(crate) total: i64,
    pub(crate) graded: i64,
    pub(crate) points: i64,
}

/// Answer row joined with the question fields the review/grading views need.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AnswerWithQuestion {
    pub(crate) question_id: String,
    pub(crate) order_index: i32,
    pub(crate) question_type: QuestionType,
    pub(crate) points: i32,
    pub(crate) selected_option: Option<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) is_correct: Option<bool>,
    pub(crate) points_awarded: Option<i32>,
    pub(crate) feedback: Option<String>,
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    params: NewAnswer<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO answers
            (id, attempt_id, question_id, selected_option, text_answer, is_correct,
             points_awarded, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(params.id)
    .bind(params.attempt_id)
    .bind(params.question_id)
    .bind(params.selected_option)
    .bind(params.text_answer)
    .bind(params.is_correct)
    .bind(params.points_awarded)
    .bind(params.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub(crate) async fn totals(
    conn: &mut PgConnection,
    attempt_id: &str,
) -> Result<AnswerTotals, sqlx::Error> {
    sqlx::query_as::<_, AnswerTotals>(
        "SELECT COUNT(*) AS total,
                COUNT(points_awarded) AS graded,
                COALESCE(SUM(points_awarded), 0)::int8 AS points
         FROM answers
         WHERE attempt_id = $1",
    )
    .bind(attempt_id)
    .fetch_one(conn)
    .await
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn apply_grade(
    conn: &mut PgConnection,
    attempt_id: &str,
    question_id: &str,
    points_awarded: i32,
    is_correct: bool,
    feedback: Option<&str>,
    graded_by: &str,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE answers
         SET points_awarded = $3,
             is_correct = $4,
             feedback = $5,
             graded_by = $6,
             graded_at = $7
         WHERE attempt_id = $1 AND question_id = $2",
    )
    .bind(attempt_id)
    .bind(question_id)
    .bind(points_awarded)
    .bind(is_correct)
    .bind(feedback)
    .bind(graded_by)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(updated.rows_affected())
}

pub(crate) async fn list_with_questions(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Vec<AnswerWithQuestion>, sqlx::Error> {
    sqlx::query_as::<_, AnswerWithQuestion>(
        "SELECT ans.question_id,
                q.order_index,
                q.question_type,
                q.points,
                ans.selected_option,
                ans.text_answer,
                ans.is_correct,
                ans.points_awarded,
                ans.feedback
         FROM answers ans
         JOIN questions q ON q.id = ans.question_id
         WHERE ans.attempt_id = $1
         ORDER BY q.order_index",
    )
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}
