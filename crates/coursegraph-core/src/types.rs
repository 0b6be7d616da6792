use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type CourseId = String;

/// Credits at which the bundled curriculum considers a student graduated.
pub const DEFAULT_GRADUATION_CREDITS: u32 = 300;

/// Course grouping used by the category tabs. Never affects graph structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Basic,
    Specialized,
    Project,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Basic,
        Category::Specialized,
        Category::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Basic => "basic",
            Category::Specialized => "specialized",
            Category::Project => "project",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(Category::General),
            "basic" => Ok(Category::Basic),
            "specialized" => Ok(Category::Specialized),
            "project" => Ok(Category::Project),
            other => Err(format!(
                "unknown category '{}' (expected general, basic, specialized or project)",
                other
            )),
        }
    }
}

/// Specialization track. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    #[serde(rename = "SE")]
    SoftwareEngineering,
    #[serde(rename = "AI")]
    ArtificialIntelligence,
    #[serde(rename = "SCN")]
    NetworksAndSystems,
}

impl Track {
    pub fn code(&self) -> &'static str {
        match self {
            Track::SoftwareEngineering => "SE",
            Track::ArtificialIntelligence => "AI",
            Track::NetworksAndSystems => "SCN",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Track::SoftwareEngineering => "Software Engineering",
            Track::ArtificialIntelligence => "Artificial Intelligence",
            Track::NetworksAndSystems => "Networks & Systems",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Track {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SE" => Ok(Track::SoftwareEngineering),
            "AI" => Ok(Track::ArtificialIntelligence),
            "SCN" => Ok(Track::NetworksAndSystems),
            other => Err(format!("unknown track '{}' (expected SE, AI or SCN)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Professional,
    Intellectual,
    General,
}
