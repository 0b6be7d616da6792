// ABOUTME: Eligibility of a course against the completed set and credit total
// ABOUTME: Derives locked/available flags and the human-readable lock reason

use crate::ProgressState;
use coursegraph_core::{Catalog, Course, CourseId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a course cannot be selected yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockReason {
    /// Prerequisites not in the completed set, in declaration order.
    MissingPrerequisites {
        ids: Vec<CourseId>,
        names: Vec<String>,
    },
    /// Prerequisites are met but the credit threshold is not.
    InsufficientCredits { required: u32, current: u32 },
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockReason::MissingPrerequisites { names, .. } => {
                write!(f, "requires {}", names.join(", "))
            }
            LockReason::InsufficientCredits { required, current } => write!(
                f,
                "requires {} completed credits ({} so far)",
                required, current
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Locked(LockReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn lock_reason(&self) -> Option<&LockReason> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Locked(reason) => Some(reason),
        }
    }
}

/// Per-course flags handed to the layout and presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStatus {
    pub id: CourseId,
    pub prereqs_met: bool,
    pub credits_met: bool,
    pub is_completed: bool,
}

impl CourseStatus {
    pub fn is_locked(&self) -> bool {
        !(self.prereqs_met && self.credits_met)
    }

    pub fn is_available(&self) -> bool {
        !self.is_completed && !self.is_locked()
    }
}

/// Dangling prerequisite ids are ignored, so they never hold a course back.
pub fn course_status(catalog: &Catalog, course: &Course, state: &ProgressState) -> CourseStatus {
    CourseStatus {
        id: course.id.clone(),
        prereqs_met: catalog
            .resolved_prerequisites(course)
            .all(|p| state.is_completed(&p.id)),
        credits_met: credits_met(course, state.total_credits()),
        is_completed: state.is_completed(&course.id),
    }
}

/// Missing prerequisites take precedence over a credit shortfall.
pub fn evaluate(catalog: &Catalog, course: &Course, state: &ProgressState) -> Eligibility {
    let missing: Vec<&Course> = catalog
        .resolved_prerequisites(course)
        .filter(|p| !state.is_completed(&p.id))
        .collect();

    if !missing.is_empty() {
        return Eligibility::Locked(LockReason::MissingPrerequisites {
            ids: missing.iter().map(|p| p.id.clone()).collect(),
            names: missing.iter().map(|p| p.name.clone()).collect(),
        });
    }

    match course.min_credits_required {
        Some(required) if state.total_credits() < required => {
            Eligibility::Locked(LockReason::InsufficientCredits {
                required,
                current: state.total_credits(),
            })
        }
        _ => Eligibility::Eligible,
    }
}

fn credits_met(course: &Course, total_credits: u32) -> bool {
    course
        .min_credits_required
        .map_or(true, |required| total_credits >= required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegraph_core::Category;

    fn catalog() -> Catalog {
        Catalog::from_courses(vec![
            Course::new("X", "Course X", 50, Category::Basic),
            Course::new("Y", "Course Y", 50, Category::Basic),
            Course::new("Z", "Course Z", 5, Category::Basic),
            Course::new("T", "Target", 5, Category::Specialized)
                .with_prerequisites(["X", "Y"])
                .with_min_credits(100),
            Course::new("D", "Dangling", 5, Category::Basic).with_prerequisites(["GONE"]),
        ])
    }

    fn state_with(catalog: &Catalog, ids: &[&str]) -> ProgressState {
        let mut state = ProgressState::new();
        for id in ids {
            state.insert(catalog.get(id).unwrap());
        }
        state
    }

    #[test]
    fn eligible_only_when_prerequisites_and_credits_hold() {
        let catalog = catalog();
        let target = catalog.get("T").unwrap();

        let both = state_with(&catalog, &["X", "Y"]);
        assert!(evaluate(&catalog, target, &both).is_eligible());

        let only_x = state_with(&catalog, &["X", "Z"]);
        assert!(!evaluate(&catalog, target, &only_x).is_eligible());

        let empty = ProgressState::new();
        assert!(!course_status(&catalog, target, &empty).prereqs_met);
    }

    #[test]
    fn repeated_prerequisite_is_named_once() {
        let catalog = Catalog::from_courses(vec![
            Course::new("A", "Course A", 5, Category::Basic),
            Course::new("B", "Course B", 5, Category::Basic).with_prerequisites(["A", "A"]),
        ]);
        let eligibility = evaluate(&catalog, catalog.get("B").unwrap(), &ProgressState::new());

        assert_eq!(
            eligibility.lock_reason(),
            Some(&LockReason::MissingPrerequisites {
                ids: vec!["A".into()],
                names: vec!["Course A".into()],
            })
        );
        assert_eq!(eligibility.lock_reason().unwrap().to_string(), "requires Course A");
    }

    #[test]
    fn credit_shortfall_locks_when_prerequisites_met() {
        let catalog = Catalog::from_courses(vec![
            Course::new("X", "Course X", 5, Category::Basic),
            Course::new("T", "Target", 5, Category::Basic)
                .with_prerequisites(["X"])
                .with_min_credits(100),
        ]);
        let state = state_with(&catalog, &["X"]);
        let target = catalog.get("T").unwrap();

        assert_eq!(
            evaluate(&catalog, target, &state),
            Eligibility::Locked(LockReason::InsufficientCredits {
                required: 100,
                current: 5
            })
        );
        let status = course_status(&catalog, target, &state);
        assert!(status.prereqs_met);
        assert!(!status.credits_met);
        assert!(status.is_locked());
    }

    #[test]
    fn missing_prerequisites_take_precedence() {
        let catalog = catalog();
        let state = state_with(&catalog, &["Y"]);
        let eligibility = evaluate(&catalog, catalog.get("T").unwrap(), &state);

        assert_eq!(
            eligibility.lock_reason(),
            Some(&LockReason::MissingPrerequisites {
                ids: vec!["X".to_string()],
                names: vec!["Course X".to_string()],
            })
        );
        assert_eq!(eligibility.lock_reason().unwrap().to_string(), "requires Course X");
    }

    #[test]
    fn dangling_prerequisite_is_vacuous() {
        let catalog = catalog();
        let state = ProgressState::new();
        let status = course_status(&catalog, catalog.get("D").unwrap(), &state);
        assert!(status.is_available());
    }

    #[test]
    fn completed_course_is_not_available() {
        let catalog = catalog();
        let state = state_with(&catalog, &["Z"]);
        let status = course_status(&catalog, catalog.get("Z").unwrap(), &state);
        assert!(status.is_completed);
        assert!(!status.is_locked());
        assert!(!status.is_available());
    }
}
