pub(crate) mod answers;
pub(crate) mod attempts;
pub(crate) mod autograde;
pub(crate) mod error;
pub(crate) mod grading;
pub(crate) mod policy;
pub(crate) mod progress;
pub(crate) mod scoring;
