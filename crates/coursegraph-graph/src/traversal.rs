use crate::UnlockMap;
use coursegraph_core::{Catalog, CourseId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which way a chain walk follows edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards prerequisites (ancestors).
    Prerequisites,
    /// Towards courses unlocked (descendants).
    Unlocks,
}

/// Configuration for chain walks
#[derive(Debug, Clone, Default)]
pub struct TraversalConfig {
    /// Maximum hop count from the start (None for unlimited)
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStep {
    pub id: CourseId,
    /// Hops from the start course.
    pub distance: usize,
}

/// Breadth-first walk from `start`, nearest courses first. The start itself
/// is not reported, each course appears once, and cycles are cut by the
/// visited set. Unknown starts yield an empty chain.
pub fn walk(
    catalog: &Catalog,
    unlocks: &UnlockMap,
    start: &str,
    direction: Direction,
    config: &TraversalConfig,
) -> Vec<ChainStep> {
    if !catalog.contains(start) {
        return Vec::new();
    }

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    let mut chain = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if let Some(max_depth) = config.max_depth {
            if depth >= max_depth {
                continue;
            }
        }

        let neighbours: Vec<&str> = match direction {
            Direction::Prerequisites => catalog
                .get(current)
                .map(|course| {
                    catalog
                        .resolved_prerequisites(course)
                        .map(|p| p.id.as_str())
                        .collect()
                })
                .unwrap_or_default(),
            Direction::Unlocks => unlocks
                .unlocks_of(current)
                .iter()
                .map(String::as_str)
                .collect(),
        };

        for next in neighbours {
            if visited.insert(next) {
                chain.push(ChainStep {
                    id: next.to_string(),
                    distance: depth + 1,
                });
                queue.push_back((next, depth + 1));
            }
        }
    }

    chain
}
