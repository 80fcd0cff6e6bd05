use sqlx::PgPool;

/// Visibility check for the attempt engine: an activity is open to a student
/// when they are enrolled in a class of its course. Class rosters are managed
/// by the platform, not by this service.
pub(crate) async fn is_enrolled_in_course(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1
            FROM class_members cm
            JOIN classes c ON c.id = cm.class_id
            WHERE cm.student_id = $1
              AND c.course_id = $2
        )",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}
