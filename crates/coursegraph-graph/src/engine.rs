use crate::{
    compute_ranks, group_levels, highlight, relation_of, walk, ChainStep, Direction, Highlight,
    PrerequisiteEdge, Rank, RankTable, Relation, TraversalConfig, UnlockMap,
};
use coursegraph_core::{Catalog, Course, CourseId, DataIntegrityWarning};
use tracing::{info, warn};

/// Static analysis of a catalog, computed once at load and read-only after.
#[derive(Debug, Clone)]
pub struct PrerequisiteGraph {
    catalog: Catalog,
    ranks: RankTable,
    levels: Vec<Vec<CourseId>>,
    unlocks: UnlockMap,
    warnings: Vec<DataIntegrityWarning>,
}

impl PrerequisiteGraph {
    pub fn build(catalog: Catalog) -> Self {
        let ranks = compute_ranks(&catalog);
        let levels = group_levels(&catalog, &ranks);
        let unlocks = UnlockMap::build(&catalog);

        let mismatches = unlocks.mismatches(&catalog);
        for mismatch in &mismatches {
            warn!("Catalog integrity: {}", mismatch);
        }

        let mut warnings = catalog.warnings().to_vec();
        warnings.extend(ranks.cycle_warnings());
        warnings.extend(mismatches);

        info!(
            "Prerequisite graph ready: {} courses, {} edges, {} levels",
            catalog.len(),
            unlocks.edge_count(),
            levels.len()
        );

        Self {
            catalog,
            ranks,
            levels,
            unlocks,
            warnings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.catalog.get(id)
    }

    pub fn rank(&self, id: &str) -> Option<Rank> {
        self.ranks.get(id)
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Course ids bucketed by rank; index is the rank.
    pub fn levels(&self) -> &[Vec<CourseId>] {
        &self.levels
    }

    pub fn level(&self, rank: Rank) -> impl Iterator<Item = &Course> + '_ {
        self.levels
            .get(rank as usize)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.catalog.get(id))
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.ranks.max_rank()
    }

    /// Courses with no resolvable prerequisite.
    pub fn roots(&self) -> impl Iterator<Item = &Course> + '_ {
        self.catalog
            .iter()
            .filter(move |c| self.catalog.resolved_prerequisites(c).next().is_none())
    }

    /// Direct prerequisites that exist in the catalog.
    pub fn prerequisites_of(&self, id: &str) -> Vec<&Course> {
        self.catalog
            .get(id)
            .map(|course| self.catalog.resolved_prerequisites(course).collect())
            .unwrap_or_default()
    }

    pub fn unlocks_of(&self, id: &str) -> &[CourseId] {
        self.unlocks.unlocks_of(id)
    }

    pub fn unlock_map(&self) -> &UnlockMap {
        &self.unlocks
    }

    pub fn edges(&self) -> impl Iterator<Item = PrerequisiteEdge> + '_ {
        self.unlocks.edges(&self.catalog)
    }

    pub fn relation_of(&self, focus: &str, candidate: &str) -> Relation {
        relation_of(&self.catalog, &self.unlocks, focus, candidate)
    }

    pub fn highlight(&self, focus: &str) -> Option<Highlight> {
        highlight(&self.catalog, &self.unlocks, focus)
    }

    /// Every transitive prerequisite, nearest first.
    pub fn prerequisite_chain(&self, id: &str) -> Vec<ChainStep> {
        walk(
            &self.catalog,
            &self.unlocks,
            id,
            Direction::Prerequisites,
            &TraversalConfig::default(),
        )
    }

    /// Every course transitively unlocked, nearest first.
    pub fn unlock_chain(&self, id: &str) -> Vec<ChainStep> {
        walk(
            &self.catalog,
            &self.unlocks,
            id,
            Direction::Unlocks,
            &TraversalConfig::default(),
        )
    }

    pub fn chain(&self, id: &str, direction: Direction, config: &TraversalConfig) -> Vec<ChainStep> {
        walk(&self.catalog, &self.unlocks, id, direction, config)
    }

    /// Catalog warnings followed by cycle and unlock-mismatch findings.
    pub fn warnings(&self) -> &[DataIntegrityWarning] {
        &self.warnings
    }

    pub fn has_cycles(&self) -> bool {
        !self.ranks.cycles().is_empty()
    }
}
