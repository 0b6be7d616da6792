use crate::LockReason;
use coursegraph_core::CourseId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    #[error("Course {id} is locked: {reason}")]
    Locked { id: CourseId, reason: LockReason },

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for ProgressError {
    fn from(err: std::io::Error) -> Self {
        ProgressError::Snapshot(err.to_string())
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        ProgressError::Snapshot(err.to_string())
    }
}

impl ProgressError {
    /// The lock reason when this is a locked rejection.
    pub fn lock_reason(&self) -> Option<&LockReason> {
        match self {
            ProgressError::Locked { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProgressError>;
