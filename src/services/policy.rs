use crate::db::types::ActivityType;

use super::error::EngineError;

/// Start-gate rules derived from the activity kind. Control works lock after
/// the first graded attempt regardless of how many attempts remain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttemptPolicy {
    pub(crate) max_attempts: u32,
    pub(crate) relock_on_graded: bool,
}

impl AttemptPolicy {
    pub(crate) fn for_activity(max_attempts: u32, activity_type: ActivityType) -> Self {
        AttemptPolicy {
            max_attempts,
            relock_on_graded: matches!(activity_type, ActivityType::ControlWork),
        }
    }

    /// `finished_count` counts attempts that left IN_PROGRESS; an abandoned
    /// in-progress attempt never consumes the budget.
    pub(crate) fn check_start(
        &self,
        finished_count: i64,
        any_graded: bool,
    ) -> Result<(), EngineError> {
        if finished_count >= i64::from(self.max_attempts) {
            return Err(EngineError::AttemptLimitExceeded {
                max_attempts: self.max_attempts,
            });
        }
        if self.relock_on_graded && any_graded {
            return Err(EngineError::ActivityLocked);
        }
        Ok(())
    }
}
