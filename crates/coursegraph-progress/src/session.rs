// ABOUTME: Owned curriculum session combining the static graph with mutable progress
// ABOUTME: Every mutation goes through toggle, select_all_eligible, reset or restore

use crate::{
    course_status, evaluate, CourseStatus, Eligibility, ProgressError, ProgressSnapshot,
    ProgressState, RestoreReport, Result, SnapshotStore, YearStatus,
};
use coursegraph_core::{Catalog, Category, Course, CourseId};
use coursegraph_graph::{Highlight, PrerequisiteGraph, Rank, Relation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// New membership of a toggled course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Completed,
    Uncompleted,
}

#[derive(Debug, Clone)]
pub struct CurriculumSession {
    graph: PrerequisiteGraph,
    state: ProgressState,
}

impl CurriculumSession {
    pub fn new(graph: PrerequisiteGraph) -> Self {
        Self {
            graph,
            state: ProgressState::new(),
        }
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::new(PrerequisiteGraph::build(catalog))
    }

    pub fn graph(&self) -> &PrerequisiteGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &Catalog {
        self.graph.catalog()
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn get_rank(&self, id: &str) -> Option<Rank> {
        self.graph.rank(id)
    }

    pub fn get_levels(&self) -> &[Vec<CourseId>] {
        self.graph.levels()
    }

    fn course(&self, id: &str) -> Result<&Course> {
        self.graph
            .course(id)
            .ok_or_else(|| ProgressError::UnknownCourse(id.to_string()))
    }

    pub fn eligibility(&self, id: &str) -> Result<Eligibility> {
        let course = self.course(id)?;
        Ok(evaluate(self.catalog(), course, &self.state))
    }

    /// False for unknown ids.
    pub fn is_eligible(&self, id: &str) -> bool {
        self.eligibility(id)
            .map(|e| e.is_eligible())
            .unwrap_or(false)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.state.is_completed(id)
    }

    pub fn course_status(&self, id: &str) -> Option<CourseStatus> {
        self.graph
            .course(id)
            .map(|course| course_status(self.catalog(), course, &self.state))
    }

    /// Statuses for every course, in catalog order.
    pub fn course_statuses(&self) -> Vec<CourseStatus> {
        self.catalog()
            .iter()
            .map(|course| course_status(self.catalog(), course, &self.state))
            .collect()
    }

    /// Flip membership of `id`. A locked course is rejected either way, even
    /// when already completed. Uncompleting leaves dependents untouched.
    pub fn toggle(&mut self, id: &str) -> Result<ToggleOutcome> {
        let course = self
            .graph
            .course(id)
            .ok_or_else(|| ProgressError::UnknownCourse(id.to_string()))?;

        if let Eligibility::Locked(reason) = evaluate(self.graph.catalog(), course, &self.state) {
            warn!("Rejected toggle of {}: {}", course.id, reason);
            return Err(ProgressError::Locked {
                id: course.id.clone(),
                reason,
            });
        }

        if self.state.is_completed(&course.id) {
            self.state.remove(course);
            info!("Uncompleted {}, total credits {}", course.id, self.state.total_credits());
            return Ok(ToggleOutcome::Uncompleted);
        }

        self.state.insert(course);
        info!("Completed {}, total credits {}", course.id, self.state.total_credits());
        Ok(ToggleOutcome::Completed)
    }

    /// Complete every course of `category` that is available right now.
    /// Courses unlocked by this same batch wait for the next call.
    pub fn select_all_eligible(&mut self, category: Category) -> usize {
        let catalog = self.graph.catalog();
        let available: Vec<&Course> = catalog
            .in_category(category)
            .filter(|course| course_status(catalog, course, &self.state).is_available())
            .collect();

        let mut added = 0;
        for course in available {
            if self.state.insert(course) {
                added += 1;
            }
        }

        info!("Selected {} eligible {} courses", added, category);
        added
    }

    pub fn reset(&mut self) {
        let cleared = self.state.len();
        self.state.clear();
        info!("Reset progress, cleared {} courses", cleared);
    }

    pub fn total_credits(&self) -> u32 {
        self.state.total_credits()
    }

    pub fn year_status(&self) -> YearStatus {
        YearStatus::from_credits(self.state.total_credits())
    }

    pub fn graduation_credits(&self) -> u32 {
        self.catalog().graduation_credits()
    }

    pub fn remaining_credits(&self) -> u32 {
        self.graduation_credits()
            .saturating_sub(self.state.total_credits())
    }

    /// Share of graduation credits earned, capped at 1.
    pub fn graduation_progress(&self) -> f64 {
        let required = self.graduation_credits();
        if required == 0 {
            return 1.0;
        }
        (self.state.total_credits() as f64 / required as f64).min(1.0)
    }

    pub fn relation_of(&self, focus: &str, candidate: &str) -> Relation {
        self.graph.relation_of(focus, candidate)
    }

    pub fn highlight(&self, focus: &str) -> Option<Highlight> {
        self.graph.highlight(focus)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.state.completed_ids(self.graph.catalog()))
    }

    /// Replace progress with `snapshot`. Ids missing from the catalog are
    /// dropped; eligibility is not re-checked.
    pub fn restore(&mut self, snapshot: &ProgressSnapshot) -> RestoreReport {
        let report = self.state.restore(self.graph.catalog(), snapshot.ids());
        if !report.dropped.is_empty() {
            warn!(
                "Dropped {} unknown courses from snapshot: {}",
                report.dropped.len(),
                report.dropped.join(", ")
            );
        }
        info!(
            "Restored {} completed courses ({} credits)",
            report.restored,
            self.state.total_credits()
        );
        report
    }

    /// A failing store read falls back to an empty completed set.
    pub fn load_from<S: SnapshotStore + ?Sized>(&mut self, store: &S) -> RestoreReport {
        let snapshot = store.load().unwrap_or_else(|e| {
            warn!("Could not read snapshot, starting empty: {}", e);
            ProgressSnapshot::default()
        });
        self.restore(&snapshot)
    }

    pub fn save_to<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.save(&self.snapshot())
    }
}
