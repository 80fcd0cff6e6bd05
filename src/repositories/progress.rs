use sqlx::PgPool;

use crate::db::types::AttemptStatus;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OverviewCounts {
    pub(crate) required_tests: i64,
    pub(crate) completed_tests: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TopicStatsRow {
    pub(crate) topic: String,
    pub(crate) attempt_count: i64,
    pub(crate) graded_count: i64,
    pub(crate) average_best_percent: Option<f64>,
}

/// Published activities in the course vs. the distinct ones the student has
/// at least one GRADED attempt on.
pub(crate) async fn overview_counts(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<OverviewCounts, sqlx::Error> {
    sqlx::query_as::<_, OverviewCounts>(
        "SELECT
            (SELECT COUNT(*)
             FROM activities
             WHERE course_id = $2
               AND is_published) AS required_tests,
            (SELECT COUNT(DISTINCT att.activity_id)
             FROM attempts att
             JOIN activities act ON act.id = att.activity_id
             WHERE att.student_id = $1
               AND act.course_id = $2
               AND act.is_published
               AND att.status = $3) AS completed_tests",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(AttemptStatus::Graded)
    .fetch_one(pool)
    .await
}

/// Per topic: how many attempts the student has finished, how many are graded,
/// and the average over activities of the best graded percent. An activity
/// whose snapshot `max_score` is zero counts as fully earned once graded.
pub(crate) async fn topic_stats(
    pool: &PgPool,
    student_id: &str,
    course_id: Option<&str>,
) -> Result<Vec<TopicStatsRow>, sqlx::Error> {
    sqlx::query_as::<_, TopicStatsRow>(
        "WITH per_activity AS (
            SELECT act.topic,
                   act.id AS activity_id,
                   COUNT(*) FILTER (WHERE att.status <> $3) AS attempt_count,
                   COUNT(*) FILTER (WHERE att.status = $4) AS graded_count,
                   MAX(CASE
                           WHEN att.status = $4 AND att.max_score > 0
                               THEN att.score::float8 / att.max_score::float8
                           WHEN att.status = $4
                               THEN 1.0
                       END) AS best_percent
            FROM attempts att
            JOIN activities act ON act.id = att.activity_id
            WHERE att.student_id = $1
              AND ($2::text IS NULL OR act.course_id = $2)
            GROUP BY act.topic, act.id
         )
         SELECT topic,
                COALESCE(SUM(attempt_count), 0)::int8 AS attempt_count,
                COALESCE(SUM(graded_count), 0)::int8 AS graded_count,
                AVG(best_percent) * 100 AS average_best_percent
         FROM per_activity
         GROUP BY topic
         ORDER BY topic",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(AttemptStatus::InProgress)
    .bind(AttemptStatus::Graded)
    .fetch_all(pool)
    .await
}
