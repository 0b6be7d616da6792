use crate::RestoreReport;
use coursegraph_core::{Catalog, Course, CourseId};
use rustc_hash::FxHashSet;
use tracing::debug;

/// The completed-course set and its running credit total.
///
/// Only courses handed in as catalog records can enter the set, so the
/// total always equals the sum of credits of the completed courses.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    completed: FxHashSet<CourseId>,
    total_credits: u32,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn total_credits(&self) -> u32 {
        self.total_credits
    }

    /// Returns false if the course was already completed.
    pub fn insert(&mut self, course: &Course) -> bool {
        if !self.completed.insert(course.id.clone()) {
            return false;
        }
        self.total_credits = self.total_credits.saturating_add(course.credits);
        debug!("Completed {} (+{} credits)", course.id, course.credits);
        true
    }

    /// Returns false if the course was not completed.
    pub fn remove(&mut self, course: &Course) -> bool {
        if !self.completed.remove(&course.id) {
            return false;
        }
        self.total_credits = self.total_credits.saturating_sub(course.credits);
        debug!("Uncompleted {} (-{} credits)", course.id, course.credits);
        true
    }

    pub fn clear(&mut self) {
        self.completed.clear();
        self.total_credits = 0;
    }

    /// Completed ids in catalog order.
    pub fn completed_ids(&self, catalog: &Catalog) -> Vec<CourseId> {
        catalog
            .iter()
            .filter(|c| self.completed.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Replace the set with `ids`, dropping anything the catalog lacks.
    pub fn restore<'a, I>(&mut self, catalog: &Catalog, ids: I) -> RestoreReport
    where
        I: IntoIterator<Item = &'a CourseId>,
    {
        self.clear();
        let mut report = RestoreReport::default();

        for id in ids {
            match catalog.get(id.trim()) {
                Some(course) => {
                    if self.insert(course) {
                        report.restored += 1;
                    }
                }
                None => report.dropped.push(id.clone()),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegraph_core::Category;

    fn catalog() -> Catalog {
        Catalog::from_courses(vec![
            Course::new("A", "A", 5, Category::Basic),
            Course::new("B", "B", 6, Category::Basic),
            Course::new("C", "C", 4, Category::General),
        ])
    }

    #[test]
    fn credits_are_maintained_incrementally() {
        let catalog = catalog();
        let mut state = ProgressState::new();

        assert!(state.insert(catalog.get("A").unwrap()));
        assert!(state.insert(catalog.get("B").unwrap()));
        assert!(!state.insert(catalog.get("B").unwrap()));
        assert_eq!(state.total_credits(), 11);

        assert!(state.remove(catalog.get("A").unwrap()));
        assert!(!state.remove(catalog.get("A").unwrap()));
        assert_eq!(state.total_credits(), 6);

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.total_credits(), 0);
    }

    #[test]
    fn restore_drops_unknown_ids() {
        let catalog = catalog();
        let mut state = ProgressState::new();
        let ids = vec![
            "C".to_string(),
            "OLD101".to_string(),
            "A".to_string(),
            "A".to_string(),
        ];

        let report = state.restore(&catalog, &ids);

        assert_eq!(report.restored, 2);
        assert_eq!(report.dropped, vec!["OLD101"]);
        assert_eq!(state.total_credits(), 9);
        assert_eq!(state.completed_ids(&catalog), vec!["A", "C"]);
    }
}
