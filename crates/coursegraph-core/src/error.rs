use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::CourseId;

#[derive(Error, Debug)]
pub enum CourseGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, CourseGraphError>;

/// Recoverable data problems found while loading or analysing a catalog.
///
/// None of these stop the engine: the offending record or edge is dropped
/// or ignored and the warning is kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIntegrityWarning {
    /// Record at `index` could not be read as a course and was quarantined.
    MalformedRecord { index: usize, reason: String },
    /// A later record reused an id; only the first one is kept.
    DuplicateCourse { id: CourseId },
    /// The course listed itself as a prerequisite; the edge was removed.
    SelfPrerequisite { id: CourseId },
    DanglingPrerequisite { course: CourseId, missing: CourseId },
    DanglingUnlock { course: CourseId, missing: CourseId },
    /// The declared `unlocks` list disagrees with the derived relation.
    UnlocksMismatch {
        course: CourseId,
        undeclared: Vec<CourseId>,
        unsupported: Vec<CourseId>,
    },
    PrerequisiteCycle { path: Vec<CourseId> },
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIntegrityWarning::MalformedRecord { index, reason } => {
                write!(f, "record #{} quarantined: {}", index, reason)
            }
            DataIntegrityWarning::DuplicateCourse { id } => {
                write!(f, "duplicate course id '{}' ignored", id)
            }
            DataIntegrityWarning::SelfPrerequisite { id } => {
                write!(f, "course '{}' lists itself as a prerequisite", id)
            }
            DataIntegrityWarning::DanglingPrerequisite { course, missing } => {
                write!(f, "course '{}' requires unknown course '{}'", course, missing)
            }
            DataIntegrityWarning::DanglingUnlock { course, missing } => {
                write!(f, "course '{}' unlocks unknown course '{}'", course, missing)
            }
            DataIntegrityWarning::UnlocksMismatch {
                course,
                undeclared,
                unsupported,
            } => write!(
                f,
                "course '{}' unlocks field out of sync (missing: [{}], not backed by prerequisites: [{}])",
                course,
                undeclared.join(", "),
                unsupported.join(", ")
            ),
            DataIntegrityWarning::PrerequisiteCycle { path } => {
                write!(f, "prerequisite cycle: {}", path.join(" -> "))
            }
        }
    }
}
