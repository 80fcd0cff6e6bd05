use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::types::AttemptStatus;

/// Submitted attempt with at least one ungraded answer, as surfaced in the
/// teacher-facing queue. `class_id`/`class_title` come from the student's
/// earliest enrollment in the activity's course and may be absent.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PendingAttemptRow {
    pub(crate) attempt_id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) activity_id: String,
    pub(crate) activity_title: String,
    pub(crate) course_id: String,
    pub(crate) class_id: Option<String>,
    pub(crate) class_title: Option<String>,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) ungraded_count: i64,
}

#[derive(Debug, Default)]
pub(crate) struct PendingFilter {
    pub(crate) course_id: Option<String>,
    pub(crate) class_id: Option<String>,
    pub(crate) activity_id: Option<String>,
}

const PENDING_FROM: &str = "\
    FROM attempts att
    JOIN activities act ON act.id = att.activity_id
    JOIN users u ON u.id = att.student_id
    JOIN answers ans ON ans.attempt_id = att.id
    LEFT JOIN LATERAL (
        SELECT c.id, c.title
        FROM class_members cm
        JOIN classes c ON c.id = cm.class_id
        WHERE cm.student_id = att.student_id
          AND c.course_id = act.course_id
        ORDER BY cm.joined_at
        LIMIT 1
    ) cls ON TRUE
    WHERE att.status = $1
      AND ($2::text IS NULL OR act.course_id = $2)
      AND ($3::text IS NULL OR cls.id = $3)
      AND ($4::text IS NULL OR att.activity_id = $4)";

pub(crate) async fn list_pending(
    pool: &PgPool,
    filter: &PendingFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PendingAttemptRow>, sqlx::Error> {
    sqlx::query_as::<_, PendingAttemptRow>(&format!(
        "SELECT att.id AS attempt_id,
                att.student_id,
                u.full_name AS student_name,
                att.activity_id,
                act.title AS activity_title,
                act.course_id,
                cls.id AS class_id,
                cls.title AS class_title,
                att.submitted_at,
                COUNT(*) FILTER (WHERE ans.points_awarded IS NULL) AS ungraded_count
         {PENDING_FROM}
         GROUP BY att.id, att.student_id, u.full_name, att.activity_id, act.title,
                  act.course_id, cls.id, cls.title, att.submitted_at
         HAVING COUNT(*) FILTER (WHERE ans.points_awarded IS NULL) > 0
         ORDER BY att.submitted_at ASC
         LIMIT $5 OFFSET $6"
    ))
    .bind(AttemptStatus::Submitted)
    .bind(filter.course_id.as_deref())
    .bind(filter.class_id.as_deref())
    .bind(filter.activity_id.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_pending(
    pool: &PgPool,
    filter: &PendingFilter,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM (
            SELECT att.id
            {PENDING_FROM}
            GROUP BY att.id
            HAVING COUNT(*) FILTER (WHERE ans.points_awarded IS NULL) > 0
         ) pending"
    ))
    .bind(AttemptStatus::Submitted)
    .bind(filter.course_id.as_deref())
    .bind(filter.class_id.as_deref())
    .bind(filter.activity_id.as_deref())
    .fetch_one(pool)
    .await
}
