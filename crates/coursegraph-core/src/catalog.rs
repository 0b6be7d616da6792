// ABOUTME: Immutable, validated course catalog loaded once per session
// ABOUTME: Quarantines malformed records and reports dangling or self-referencing edges

use crate::{
    Category, Course, CourseGraphError, CourseId, DataIntegrityWarning, Result, Track,
    DEFAULT_GRADUATION_CREDITS,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;
use tracing::{debug, info, warn};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Document formats a catalog can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(CatalogFormat::Json),
            "toml" => Some(CatalogFormat::Toml),
            _ => None,
        }
    }
}

/// Ordered set of courses keyed by id. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    index: FxHashMap<CourseId, usize>,
    graduation_credits: u32,
    warnings: Vec<DataIntegrityWarning>,
}

impl Catalog {
    /// Build a catalog from already-typed records. Validation still runs:
    /// duplicates are dropped, self prerequisites stripped, dangling
    /// references reported.
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let candidates = courses.into_iter().enumerate().collect();
        Self::assemble(candidates, Vec::new(), DEFAULT_GRADUATION_CREDITS)
    }

    /// The curriculum dataset shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: JsonValue = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_document(serde_json::to_value(table)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path).ok_or_else(|| {
            CourseGraphError::Parse(format!(
                "cannot infer catalog format from '{}' (expected .json or .toml)",
                path.display()
            ))
        })?;
        let content = std::fs::read_to_string(path)?;
        debug!("Reading {:?} catalog from {}", format, path.display());
        match format {
            CatalogFormat::Json => Self::from_json_str(&content),
            CatalogFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Accepts a bare array of records, an object with a `courses` entry
    /// (array or id-keyed mapping), or an id-keyed mapping at the top level.
    fn from_document(document: JsonValue) -> Result<Self> {
        let mut graduation_credits = DEFAULT_GRADUATION_CREDITS;
        let records = match document {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut object) => {
                if let Some(credits) = object.shift_remove("graduationCredits") {
                    graduation_credits = credits
                        .as_u64()
                        .and_then(|c| u32::try_from(c).ok())
                        .filter(|c| *c > 0)
                        .ok_or_else(|| {
                            CourseGraphError::Parse(format!(
                                "graduationCredits must be a positive integer, got {}",
                                credits
                            ))
                        })?;
                }
                match object.shift_remove("courses") {
                    Some(JsonValue::Array(items)) => items,
                    Some(JsonValue::Object(mapping)) => records_from_mapping(mapping),
                    Some(other) => {
                        return Err(CourseGraphError::Parse(format!(
                            "'courses' must be an array or a mapping, got {}",
                            json_kind(&other)
                        )))
                    }
                    None => records_from_mapping(object),
                }
            }
            other => {
                return Err(CourseGraphError::Parse(format!(
                    "catalog document must be an array or an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut warnings = Vec::new();
        let mut candidates = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Course>(record) {
                Ok(course) => candidates.push((index, course)),
                Err(e) => warnings.push(DataIntegrityWarning::MalformedRecord {
                    index,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(Self::assemble(candidates, warnings, graduation_credits))
    }

    fn assemble(
        candidates: Vec<(usize, Course)>,
        mut warnings: Vec<DataIntegrityWarning>,
        graduation_credits: u32,
    ) -> Self {
        let mut courses: Vec<Course> = Vec::with_capacity(candidates.len());
        let mut index = FxHashMap::default();

        for (position, mut course) in candidates {
            course.id = course.id.trim().to_string();
            if course.id.is_empty() {
                warnings.push(DataIntegrityWarning::MalformedRecord {
                    index: position,
                    reason: "empty course id".to_string(),
                });
                continue;
            }
            if index.contains_key(&course.id) {
                warnings.push(DataIntegrityWarning::DuplicateCourse {
                    id: course.id.clone(),
                });
                continue;
            }

            let before = course.prerequisites.len();
            let own_id = course.id.clone();
            course.prerequisites.retain(|p| *p != own_id);
            if course.prerequisites.len() != before {
                warnings.push(DataIntegrityWarning::SelfPrerequisite { id: own_id });
            }
            let mut seen = FxHashSet::default();
            course.prerequisites.retain(|p| seen.insert(p.clone()));

            index.insert(course.id.clone(), courses.len());
            courses.push(course);
        }

        for course in &courses {
            for missing in course
                .prerequisites
                .iter()
                .filter(|p| !index.contains_key(p.as_str()))
            {
                warnings.push(DataIntegrityWarning::DanglingPrerequisite {
                    course: course.id.clone(),
                    missing: missing.clone(),
                });
            }
            for missing in course
                .unlocks
                .iter()
                .flatten()
                .filter(|u| !index.contains_key(u.as_str()))
            {
                warnings.push(DataIntegrityWarning::DanglingUnlock {
                    course: course.id.clone(),
                    missing: missing.clone(),
                });
            }
        }

        for warning in &warnings {
            warn!("Catalog integrity: {}", warning);
        }
        info!(
            "Loaded catalog with {} courses ({} integrity warnings)",
            courses.len(),
            warnings.len()
        );

        Self {
            courses,
            index,
            graduation_credits,
            warnings,
        }
    }

    pub fn with_graduation_credits(mut self, credits: u32) -> Self {
        if credits > 0 {
            self.graduation_credits = credits;
        }
        self
    }

    /// Courses in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.courses.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&i| &self.courses[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of the course in catalog order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Course> + '_ {
        self.courses.iter().filter(move |c| c.category == category)
    }

    pub fn in_track(&self, track: Track) -> impl Iterator<Item = &Course> + '_ {
        self.courses.iter().filter(move |c| c.track == Some(track))
    }

    /// Prerequisites of `course` that exist in this catalog. Dangling ids are
    /// skipped.
    pub fn resolved_prerequisites<'a>(
        &'a self,
        course: &'a Course,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        course.prerequisites.iter().filter_map(move |p| self.get(p))
    }

    pub fn graduation_credits(&self) -> u32 {
        self.graduation_credits
    }

    /// Sum of credits over the whole catalog.
    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }

    pub fn warnings(&self) -> &[DataIntegrityWarning] {
        &self.warnings
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Course;
    type IntoIter = std::slice::Iter<'a, Course>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.iter()
    }
}

fn records_from_mapping(mapping: Map<String, JsonValue>) -> Vec<JsonValue> {
    mapping
        .into_iter()
        .map(|(key, mut value)| {
            if let JsonValue::Object(ref mut record) = value {
                record
                    .entry("id")
                    .or_insert_with(|| JsonValue::String(key.clone()));
            }
            value
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
