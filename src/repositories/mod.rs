pub(crate) mod activities;
pub(crate) mod answers;
pub(crate) mod attempts;
pub(crate) mod enrollments;
pub(crate) mod grading;
pub(crate) mod progress;
pub(crate) mod users;
