use crate::{Category, CourseId, SkillType, Track};
use serde::{Deserialize, Serialize};

/// A single catalog entry. Field names on the wire follow the dataset's
/// camelCase spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub credits: u32,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<CourseId>,
    /// Declared forward edges. Redundant with `prerequisites` and never used
    /// for traversal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks: Option<Vec<CourseId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_credits_required: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_types: Vec<SkillType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

impl Course {
    pub fn new<I: Into<CourseId>, N: Into<String>>(
        id: I,
        name: N,
        credits: u32,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credits,
            category,
            prerequisites: Vec::new(),
            unlocks: None,
            min_credits_required: None,
            description: None,
            skill_types: Vec::new(),
            track: None,
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CourseId>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_unlocks<I, S>(mut self, unlocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CourseId>,
    {
        self.unlocks = Some(unlocks.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_credits(mut self, credits: u32) -> Self {
        self.min_credits_required = Some(credits);
        self
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_skill_types<I: IntoIterator<Item = SkillType>>(mut self, skills: I) -> Self {
        self.skill_types = skills.into_iter().collect();
        self
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }
}
