use sqlx::PgPool;

use crate::repositories::progress;
use crate::schemas::statistics::{ProgressOverviewResponse, TopicStatsResponse};

use super::error::EngineError;

pub(crate) async fn overview(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<ProgressOverviewResponse, EngineError> {
    let counts = progress::overview_counts(pool, student_id, course_id).await?;
    Ok(assemble_overview(course_id, counts.required_tests, counts.completed_tests))
}

pub(crate) async fn topics(
    pool: &PgPool,
    student_id: &str,
    course_id: Option<&str>,
) -> Result<Vec<TopicStatsResponse>, EngineError> {
    let rows = progress::topic_stats(pool, student_id, course_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| TopicStatsResponse {
            topic: row.topic,
            attempt_count: row.attempt_count,
            graded_count: row.graded_count,
            average_best_percent: row.average_best_percent,
        })
        .collect())
}

/// A course with nothing required counts as fully complete.
fn assemble_overview(
    course_id: &str,
    required_tests: i64,
    completed_tests: i64,
) -> ProgressOverviewResponse {
    let percent = if required_tests > 0 {
        completed_tests as f64 / required_tests as f64 * 100.0
    } else {
        100.0
    };
    ProgressOverviewResponse {
        course_id: course_id.to_string(),
        required_tests,
        completed_tests,
        percent,
        completed: completed_tests >= required_tests,
    }
}

#[cfg(test)]
mod tests {
    use super::assemble_overview;

    #[test]
    fn overview_percent_math() {
        let view = assemble_overview("course-1", 4, 1);
        assert!((view.percent - 25.0).abs() < f64::EPSILON);
        assert!(!view.completed);

        let view = assemble_overview("course-1", 4, 4);
        assert!((view.percent - 100.0).abs() < f64::EPSILON);
        assert!(view.completed);
    }

    #[test]
    fn empty_course_is_complete() {
        let view = assemble_overview("course-1", 0, 0);
        assert!((view.percent - 100.0).abs() < f64::EPSILON);
        assert!(view.completed);
    }
}
