use sqlx::PgConnection;
use time::PrimitiveDateTime;

use crate::repositories::{answers, attempts};

use super::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightedView {
    pub(crate) score: i32,
    pub(crate) weighted_score: f64,
    pub(crate) weighted_max_score: f64,
}

/// Applies the activity's weight to a raw score. Without a weight the
/// weighted view is just the raw numbers.
pub(crate) fn weighted_view(score: i64, max_score: i32, weight: Option<f64>) -> WeightedView {
    let factor = weight.unwrap_or(1.0);
    WeightedView {
        score: score as i32,
        weighted_score: score as f64 * factor,
        weighted_max_score: f64::from(max_score) * factor,
    }
}

/// Recomputes the attempt's aggregate from its answer rows and, once every
/// answer carries points, finalizes the attempt as GRADED. Runs inside the
/// caller's transaction so the totals and the transition commit together.
pub(crate) async fn refresh(
    conn: &mut PgConnection,
    attempt_id: &str,
    max_score: i32,
    score_weight: Option<f64>,
    now: PrimitiveDateTime,
) -> Result<bool, EngineError> {
    let totals = answers::totals(conn, attempt_id).await?;
    if totals.graded < totals.total {
        return Ok(false);
    }

    let view = weighted_view(totals.points, max_score, score_weight);
    let finalized = attempts::mark_graded(
        conn,
        attempt_id,
        view.score,
        view.weighted_score,
        view.weighted_max_score,
        now,
    )
    .await?;

    Ok(finalized)
}
