use crate::UnlockMap;
use coursegraph_core::{Catalog, CourseId};
use serde::{Deserialize, Serialize};

/// How a candidate course relates to the focused one, one hop only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[serde(rename = "self")]
    Itself,
    /// Direct prerequisite of the focus.
    Ancestor,
    /// Directly unlocked by the focus.
    Descendant,
    Unrelated,
}

/// Direct neighbourhood of a focused course, used for hover highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub focus: CourseId,
    pub ancestors: Vec<CourseId>,
    pub descendants: Vec<CourseId>,
}

impl Highlight {
    pub fn contains(&self, id: &str) -> bool {
        self.focus == id
            || self.ancestors.iter().any(|a| a == id)
            || self.descendants.iter().any(|d| d == id)
    }
}

/// Ancestor wins over descendant when both hold (a two-course cycle).
pub fn relation_of(
    catalog: &Catalog,
    unlocks: &UnlockMap,
    focus: &str,
    candidate: &str,
) -> Relation {
    let Some(course) = catalog.get(focus) else {
        return Relation::Unrelated;
    };
    if focus == candidate {
        return Relation::Itself;
    }
    if !catalog.contains(candidate) {
        return Relation::Unrelated;
    }
    if course.prerequisites.iter().any(|p| p == candidate) {
        Relation::Ancestor
    } else if unlocks.unlocks(focus, candidate) {
        Relation::Descendant
    } else {
        Relation::Unrelated
    }
}

pub fn highlight(catalog: &Catalog, unlocks: &UnlockMap, focus: &str) -> Option<Highlight> {
    let course = catalog.get(focus)?;
    Some(Highlight {
        focus: course.id.clone(),
        ancestors: catalog
            .resolved_prerequisites(course)
            .map(|p| p.id.clone())
            .collect(),
        descendants: unlocks.unlocks_of(focus).to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegraph_core::{Category, Course};

    fn chain() -> (Catalog, UnlockMap) {
        let catalog = Catalog::from_courses(vec![
            Course::new("A", "A", 5, Category::Basic),
            Course::new("B", "B", 5, Category::Basic).with_prerequisites(["A", "X"]),
            Course::new("C", "C", 5, Category::Basic).with_prerequisites(["B"]),
        ]);
        let unlocks = UnlockMap::build(&catalog);
        (catalog, unlocks)
    }

    #[test]
    fn classifies_direct_neighbours() {
        let (catalog, unlocks) = chain();
        assert_eq!(relation_of(&catalog, &unlocks, "B", "B"), Relation::Itself);
        assert_eq!(relation_of(&catalog, &unlocks, "B", "A"), Relation::Ancestor);
        assert_eq!(relation_of(&catalog, &unlocks, "B", "C"), Relation::Descendant);
    }

    #[test]
    fn relation_is_one_hop_only() {
        let (catalog, unlocks) = chain();
        assert_eq!(relation_of(&catalog, &unlocks, "C", "A"), Relation::Unrelated);
        assert_eq!(relation_of(&catalog, &unlocks, "A", "C"), Relation::Unrelated);
        assert_eq!(relation_of(&catalog, &unlocks, "B", "X"), Relation::Unrelated);
        assert_eq!(relation_of(&catalog, &unlocks, "nope", "A"), Relation::Unrelated);
    }

    #[test]
    fn highlight_collects_neighbourhood() {
        let (catalog, unlocks) = chain();
        let lit = highlight(&catalog, &unlocks, "B").unwrap();
        assert_eq!(lit.ancestors, vec!["A"]);
        assert_eq!(lit.descendants, vec!["C"]);
        assert!(lit.contains("B"));
        assert!(!lit.contains("X"));
        assert!(highlight(&catalog, &unlocks, "nope").is_none());
    }

    #[test]
    fn self_relation_serializes_as_self() {
        assert_eq!(serde_json::to_string(&Relation::Itself).unwrap(), "\"self\"");
    }
}
