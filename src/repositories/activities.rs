use crate::db::models::{Activity, Question};

pub(crate) const COLUMNS: &str = "\
    id, course_id, title, activity_type, topic, deadline, score_weight, is_published, \
    created_at, updated_at";

pub(crate) const QUESTION_COLUMNS: &str = "\
    id, activity_id, order_index, question_type, points, options, correct_option, \
    correct_text, created_at";

pub(crate) async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Activity>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Activity>(&format!("SELECT {COLUMNS} FROM activities WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list_questions<'e, E>(
    executor: E,
    activity_id: &str,
) -> Result<Vec<Question>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS}
         FROM questions
         WHERE activity_id = $1
         ORDER BY order_index"
    ))
    .bind(activity_id)
    .fetch_all(executor)
    .await
}

/// Sum of question points, snapshotted onto attempts as `max_score` at
/// creation so later catalog edits never change an existing attempt's scale.
pub(crate) async fn total_points<'e, E>(executor: E, activity_id: &str) -> Result<i64, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0)::int8 FROM questions WHERE activity_id = $1",
    )
    .bind(activity_id)
    .fetch_one(executor)
    .await
}
