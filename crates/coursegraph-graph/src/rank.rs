// ABOUTME: Longest-prerequisite-chain ranking of courses for layered layout
// ABOUTME: Iterative memoized DFS; revisiting an in-progress course counts as rank 0

use coursegraph_core::{Catalog, Course, CourseId, DataIntegrityWarning};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

pub type Rank = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done(Rank),
}

/// One pending resolution on the work stack.
struct Frame<'a> {
    course: &'a Course,
    next: usize,
    deepest: Option<Rank>,
}

impl<'a> Frame<'a> {
    fn new(course: &'a Course) -> Self {
        Self {
            course,
            next: 0,
            deepest: None,
        }
    }

    fn absorb(&mut self, rank: Rank) {
        self.deepest = Some(self.deepest.map_or(rank, |d| d.max(rank)));
    }

    fn rank(&self) -> Rank {
        self.deepest.map_or(0, |d| d + 1)
    }
}

/// Rank of every course plus the cycles met while computing them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankTable {
    ranks: FxHashMap<CourseId, Rank>,
    cycles: Vec<Vec<CourseId>>,
}

impl RankTable {
    pub fn get(&self, id: &str) -> Option<Rank> {
        self.ranks.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rank)> + '_ {
        self.ranks.iter().map(|(id, rank)| (id.as_str(), *rank))
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.ranks.values().copied().max()
    }

    /// Each cycle is the chain of courses on the stack, closed by repeating
    /// the first id.
    pub fn cycles(&self) -> &[Vec<CourseId>] {
        &self.cycles
    }

    pub fn cycle_warnings(&self) -> Vec<DataIntegrityWarning> {
        self.cycles
            .iter()
            .map(|path| DataIntegrityWarning::PrerequisiteCycle { path: path.clone() })
            .collect()
    }
}

/// Compute `rank(c) = 0` for courses without resolvable prerequisites and
/// `1 + max(rank(p))` otherwise.
///
/// Uses an explicit stack so catalog depth is not bounded by the call stack.
/// Dangling prerequisite ids are skipped. When a prerequisite is already on
/// the stack the edge contributes rank 0 and the cycle is recorded; the
/// result for cycle members is defined but not meaningful.
pub fn compute_ranks(catalog: &Catalog) -> RankTable {
    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
    let mut cycles: Vec<Vec<CourseId>> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for root in catalog.iter() {
        if marks.contains_key(root.id.as_str()) {
            continue;
        }
        marks.insert(root.id.as_str(), Mark::InProgress);
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let current = frame.course;
            let Some(prereq_id) = current.prerequisites.get(frame.next) else {
                let rank = frame.rank();
                stack.pop();
                marks.insert(current.id.as_str(), Mark::Done(rank));
                if let Some(parent) = stack.last_mut() {
                    parent.absorb(rank);
                }
                continue;
            };
            frame.next += 1;

            let Some(prereq) = catalog.get(prereq_id) else {
                continue;
            };

            match marks.get(prereq.id.as_str()).copied() {
                Some(Mark::Done(rank)) => frame.absorb(rank),
                Some(Mark::InProgress) => {
                    frame.absorb(0);
                    let start = stack
                        .iter()
                        .position(|f| f.course.id == prereq.id)
                        .unwrap_or(0);
                    let mut path: Vec<CourseId> =
                        stack[start..].iter().map(|f| f.course.id.clone()).collect();
                    path.push(prereq.id.clone());
                    warn!("Prerequisite cycle detected: {}", path.join(" -> "));
                    cycles.push(path);
                }
                None => {
                    marks.insert(prereq.id.as_str(), Mark::InProgress);
                    stack.push(Frame::new(prereq));
                }
            }
        }
    }

    let ranks: FxHashMap<CourseId, Rank> = marks
        .into_iter()
        .filter_map(|(id, mark)| match mark {
            Mark::Done(rank) => Some((id.to_string(), rank)),
            Mark::InProgress => None,
        })
        .collect();

    debug!(
        "Ranked {} courses ({} cycles)",
        ranks.len(),
        cycles.len()
    );

    RankTable { ranks, cycles }
}

/// Bucket courses by rank. Index `r` holds the rank-`r` courses in catalog
/// order; a rank with no course (possible only with cycles) stays empty.
pub fn group_levels(catalog: &Catalog, ranks: &RankTable) -> Vec<Vec<CourseId>> {
    let Some(max_rank) = ranks.max_rank() else {
        return Vec::new();
    };
    let mut levels = vec![Vec::new(); max_rank as usize + 1];
    for course in catalog.iter() {
        if let Some(rank) = ranks.get(&course.id) {
            levels[rank as usize].push(course.id.clone());
        }
    }
    levels
}
