use coursegraph_core::{Catalog, CourseId, DataIntegrityWarning};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Directed edge from a prerequisite to the course it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub from: CourseId,
    pub to: CourseId,
}

impl PrerequisiteEdge {
    pub fn new<F: Into<CourseId>, T: Into<CourseId>>(from: F, to: T) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Forward ("unlocks") relation derived from every course's prerequisites.
///
/// The catalog's own `unlocks` field is never consulted here.
#[derive(Debug, Clone, Default)]
pub struct UnlockMap {
    forward: FxHashMap<CourseId, Vec<CourseId>>,
    edge_count: usize,
}

impl UnlockMap {
    pub fn build(catalog: &Catalog) -> Self {
        let mut forward: FxHashMap<CourseId, Vec<CourseId>> = FxHashMap::default();
        let mut edge_count = 0;

        for course in catalog.iter() {
            for prereq in catalog.resolved_prerequisites(course) {
                let targets = forward.entry(prereq.id.clone()).or_default();
                if !targets.contains(&course.id) {
                    targets.push(course.id.clone());
                    edge_count += 1;
                }
            }
        }

        Self {
            forward,
            edge_count,
        }
    }

    /// Courses that list `id` as a prerequisite, in catalog order.
    pub fn unlocks_of(&self, id: &str) -> &[CourseId] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unlocks(&self, from: &str, to: &str) -> bool {
        self.unlocks_of(from).iter().any(|t| t == to)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edges grouped by source in catalog order.
    pub fn edges<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = PrerequisiteEdge> + 'a {
        catalog.iter().flat_map(move |course| {
            self.unlocks_of(&course.id)
                .iter()
                .map(move |target| PrerequisiteEdge::new(course.id.clone(), target.clone()))
        })
    }

    /// Compare declared `unlocks` lists with the derived relation. Courses
    /// without the field are skipped; dangling ids are reported by the
    /// catalog and ignored here.
    pub fn mismatches(&self, catalog: &Catalog) -> Vec<DataIntegrityWarning> {
        let mut warnings = Vec::new();

        for course in catalog.iter() {
            let Some(declared) = course.unlocks.as_ref() else {
                continue;
            };
            let declared: FxHashSet<&str> = declared
                .iter()
                .map(String::as_str)
                .filter(|id| catalog.contains(id))
                .collect();
            let derived = self.unlocks_of(&course.id);

            let undeclared: Vec<CourseId> = derived
                .iter()
                .filter(|id| !declared.contains(id.as_str()))
                .cloned()
                .collect();
            let unsupported: Vec<CourseId> = course
                .unlocks
                .iter()
                .flatten()
                .filter(|id| catalog.contains(id) && !derived.contains(id))
                .cloned()
                .collect();

            if !undeclared.is_empty() || !unsupported.is_empty() {
                warnings.push(DataIntegrityWarning::UnlocksMismatch {
                    course: course.id.clone(),
                    undeclared,
                    unsupported,
                });
            }
        }

        warnings
    }
}

/// Build the authoritative unlock relation for a catalog.
pub fn build_unlock_map(catalog: &Catalog) -> UnlockMap {
    UnlockMap::build(catalog)
}
