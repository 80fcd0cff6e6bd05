use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Attempt;
use crate::db::types::AttemptStatus;

pub(crate) const COLUMNS: &str = "\
    id, activity_id, student_id, attempt_number, status, started_at, submitted_at, graded_at, \
    score, max_score, weighted_score, weighted_max_score, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AttemptHistory {
    /// Attempts that reached SUBMITTED or GRADED; these count toward the limit.
    pub(crate) finished_count: i64,
    pub(crate) graded_count: i64,
    pub(crate) highest_number: i32,
}

pub(crate) struct NewAttempt<'a> {
    pub(crate) id: &'a str,
    pub(crate) activity_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) attempt_number: i32,
    pub(crate) max_score: i32,
    pub(crate) started_at: PrimitiveDateTime,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Attempt>, sqlx::Error> {
    sqlx::query_as::<_, Attempt>(&format!("SELECT {COLUMNS} FROM attempts WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_in_progress<'e, E>(
    executor: E,
    student_id: &str,
    activity_id: &str,
) -> Result<Option<Attempt>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Attempt>(&format!(
        "SELECT {COLUMNS}
         FROM attempts
         WHERE student_id = $1 AND activity_id = $2 AND status = $3"
    ))
    .bind(student_id)
    .bind(activity_id)
    .bind(AttemptStatus::InProgress)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn history(
    conn: &mut PgConnection,
    student_id: &str,
    activity_id: &str,
) -> Result<AttemptHistory, sqlx::Error> {
    sqlx::query_as::<_, AttemptHistory>(
        "SELECT COUNT(*) FILTER (WHERE status <> $3) AS finished_count,
                COUNT(*) FILTER (WHERE status = $4) AS graded_count,
                COALESCE(MAX(attempt_number), 0)::int4 AS highest_number
         FROM attempts
         WHERE student_id = $1 AND activity_id = $2",
    )
    .bind(student_id)
    .bind(activity_id)
    .bind(AttemptStatus::InProgress)
    .bind(AttemptStatus::Graded)
    .fetch_one(conn)
    .await
}

pub(crate) async fn create(
    conn: &mut PgConnection,
    params: NewAttempt<'_>,
) -> Result<Attempt, sqlx::Error> {
    sqlx::query_as::<_, Attempt>(&format!(
        "INSERT INTO attempts
            (id, activity_id, student_id, attempt_number, status, started_at, max_score,
             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.activity_id)
    .bind(params.student_id)
    .bind(params.attempt_number)
    .bind(AttemptStatus::InProgress)
    .bind(params.started_at)
    .bind(params.max_score)
    .fetch_one(conn)
    .await
}

/// Single-winner transition out of IN_PROGRESS; the caller that observes
/// `false` lost a concurrent submit race.
pub(crate) async fn mark_submitted(
    conn: &mut PgConnection,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE attempts
         SET status = $2, submitted_at = $3, updated_at = $3
         WHERE id = $1 AND status = $4",
    )
    .bind(id)
    .bind(AttemptStatus::Submitted)
    .bind(now)
    .bind(AttemptStatus::InProgress)
    .execute(conn)
    .await?;

    Ok(updated.rows_affected() > 0)
}

pub(crate) async fn mark_graded(
    conn: &mut PgConnection,
    id: &str,
    score: i32,
    weighted_score: f64,
    weighted_max_score: f64,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE attempts
         SET status = $2,
             score = $3,
             weighted_score = $4,
             weighted_max_score = $5,
             graded_at = $6,
             updated_at = $6
         WHERE id = $1 AND status = $7",
    )
    .bind(id)
    .bind(AttemptStatus::Graded)
    .bind(score)
    .bind(weighted_score)
    .bind(weighted_max_score)
    .bind(now)
    .bind(AttemptStatus::Submitted)
    .execute(conn)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Row lock so concurrent grade batches for the same attempt serialize and
/// the aggregation that follows never acts on a stale read.
pub(crate) async fn lock_by_id(
    conn: &mut PgConnection,
    id: &str,
) -> Result<Option<Attempt>, sqlx::Error> {
    sqlx::query_as::<_, Attempt>(&format!(
        "SELECT {COLUMNS} FROM attempts WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn list_for_student_activity(
    pool: &PgPool,
    student_id: &str,
    activity_id: &str,
) -> Result<Vec<Attempt>, sqlx::Error> {
    sqlx::query_as::<_, Attempt>(&format!(
        "SELECT {COLUMNS}
         FROM attempts
         WHERE student_id = $1 AND activity_id = $2
         ORDER BY attempt_number"
    ))
    .bind(student_id)
    .bind(activity_id)
    .fetch_all(pool)
    .await
}
