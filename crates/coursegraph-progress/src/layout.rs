// ABOUTME: Roadmap layout adapter: rank columns, level rows and connector curves
// ABOUTME: Reads the session's graph and progress, produces serializable geometry

use crate::{CourseStatus, CurriculumSession, ProgressError, Result};
use coursegraph_core::{Category, Course, CourseId, LayoutConfig, Track};
use coursegraph_graph::Rank;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Midpoint of the right edge, where outgoing connectors start.
    pub fn right_anchor(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn left_anchor(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x,
            y: self.y + self.height / 2.0,
        }
    }
}

/// Which courses take part in the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutFilter {
    #[default]
    All,
    Category(Category),
    Track(Track),
}

impl LayoutFilter {
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            LayoutFilter::All => true,
            LayoutFilter::Category(category) => course.category == *category,
            LayoutFilter::Track(track) => course.track == Some(*track),
        }
    }
}

/// A placed course with the per-course engine contract attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    pub id: CourseId,
    pub name: String,
    pub rank: Rank,
    /// Position within the rank column.
    pub row: usize,
    pub rect: LayoutRect,
    pub category: Category,
    pub track: Option<Track>,
    pub is_completed: bool,
    pub is_available: bool,
    pub is_locked: bool,
    pub unlocks: Vec<CourseId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Both ends completed.
    Completed,
    /// Source completed, target not yet.
    Active,
    Locked,
}

impl ConnectionStatus {
    fn between(from: &CourseStatus, to: &CourseStatus) -> Self {
        match (from.is_completed, to.is_completed) {
            (true, true) => ConnectionStatus::Completed,
            (true, false) => ConnectionStatus::Active,
            _ => ConnectionStatus::Locked,
        }
    }
}

/// Cubic connector from a prerequisite to a course it unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: CourseId,
    pub to: CourseId,
    pub status: ConnectionStatus,
    pub start: LayoutPoint,
    pub control1: LayoutPoint,
    pub control2: LayoutPoint,
    pub end: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapLayout {
    pub nodes: Vec<NodePlacement>,
    pub connections: Vec<Connection>,
    pub bounding_box: LayoutRect,
}

impl RoadmapLayout {
    /// Column is the course rank, row its order among the filtered courses
    /// of that rank. Connections are drawn only between placed courses.
    pub fn compute(
        session: &CurriculumSession,
        config: &LayoutConfig,
        filter: LayoutFilter,
    ) -> Self {
        let graph = session.graph();
        let column_pitch = config.node_width + config.column_gap;
        let row_pitch = config.node_height + config.row_gap;

        let mut nodes = Vec::new();
        let mut placed: FxHashMap<&str, usize> = FxHashMap::default();
        let mut statuses: FxHashMap<&str, CourseStatus> = FxHashMap::default();

        for (rank, level) in graph.levels().iter().enumerate() {
            let mut row = 0;
            for course in level.iter().filter_map(|id| graph.course(id)) {
                if !filter.matches(course) {
                    continue;
                }
                let Some(status) = session.course_status(&course.id) else {
                    continue;
                };

                let rect = LayoutRect {
                    x: rank as f64 * column_pitch,
                    y: row as f64 * row_pitch,
                    width: config.node_width,
                    height: config.node_height,
                };
                placed.insert(course.id.as_str(), nodes.len());
                nodes.push(NodePlacement {
                    id: course.id.clone(),
                    name: course.name.clone(),
                    rank: rank as Rank,
                    row,
                    rect,
                    category: course.category,
                    track: course.track,
                    is_completed: status.is_completed,
                    is_available: status.is_available(),
                    is_locked: status.is_locked(),
                    unlocks: graph.unlocks_of(&course.id).to_vec(),
                });
                statuses.insert(course.id.as_str(), status);
                row += 1;
            }
        }

        let mut connections = Vec::new();
        for edge in graph.edges() {
            let (Some(&from_idx), Some(&to_idx)) =
                (placed.get(edge.from.as_str()), placed.get(edge.to.as_str()))
            else {
                continue;
            };
            let (Some(from_status), Some(to_status)) =
                (statuses.get(edge.from.as_str()), statuses.get(edge.to.as_str()))
            else {
                continue;
            };

            let start = nodes[from_idx].rect.right_anchor();
            let end = nodes[to_idx].rect.left_anchor();
            let bend = (end.x - start.x) / 2.0;

            connections.push(Connection {
                status: ConnectionStatus::between(from_status, to_status),
                start,
                control1: LayoutPoint {
                    x: start.x + bend,
                    y: start.y,
                },
                control2: LayoutPoint {
                    x: end.x - bend,
                    y: end.y,
                },
                end,
                from: edge.from,
                to: edge.to,
            });
        }

        let bounding_box = compute_bounding_box(&nodes);
        debug!(
            "Laid out {} courses and {} connections",
            nodes.len(),
            connections.len()
        );

        Self {
            nodes,
            connections,
            bounding_box,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodePlacement> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ProgressError::from)
    }
}

fn compute_bounding_box(nodes: &[NodePlacement]) -> LayoutRect {
    let right = nodes
        .iter()
        .map(|n| n.rect.x + n.rect.width)
        .fold(0.0, f64::max);
    let bottom = nodes
        .iter()
        .map(|n| n.rect.y + n.rect.height)
        .fold(0.0, f64::max);

    LayoutRect {
        x: 0.0,
        y: 0.0,
        width: right,
        height: bottom,
    }
}
