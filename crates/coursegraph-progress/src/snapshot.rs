// ABOUTME: Serializable snapshot of the completed set and the stores that persist it
// ABOUTME: Malformed or missing snapshots recover to an empty set instead of failing

use crate::Result;
use coursegraph_core::CourseId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Plain array of completed course ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSnapshot {
    ids: Vec<CourseId>,
}

impl ProgressSnapshot {
    pub fn new(ids: Vec<CourseId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[CourseId] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<CourseId> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Accepts any JSON array, keeping its string entries. Anything else
    /// yields an empty snapshot.
    pub fn parse_lenient(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<JsonValue>(content) {
            Ok(JsonValue::Array(items)) => {
                let total = items.len();
                let ids: Vec<CourseId> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        JsonValue::String(id) => Some(id),
                        _ => None,
                    })
                    .collect();
                if ids.len() < total {
                    warn!(
                        "Snapshot contained {} non-string entries, skipped",
                        total - ids.len()
                    );
                }
                Self { ids }
            }
            Ok(_) => {
                warn!("Snapshot is not an array of course ids, starting empty");
                Self::default()
            }
            Err(e) => {
                warn!("Malformed snapshot, starting empty: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Outcome of restoring a snapshot into a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    pub restored: usize,
    /// Ids absent from the current catalog.
    pub dropped: Vec<CourseId>,
}

/// Where the completed set lives between sessions.
pub trait SnapshotStore {
    fn load(&self) -> Result<ProgressSnapshot>;
    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<ProgressSnapshot> {
        if !self.path.exists() {
            debug!("No snapshot at {}, starting empty", self.path.display());
            return Ok(ProgressSnapshot::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(ProgressSnapshot::parse_lenient(&content))
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, snapshot.to_json_string()?)?;
        info!(
            "Saved {} completed courses to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store holding the raw serialized text.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    content: Option<String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<ProgressSnapshot> {
        Ok(self
            .content
            .as_deref()
            .map(ProgressSnapshot::parse_lenient)
            .unwrap_or_default())
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.content = Some(snapshot.to_json_string()?);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.content = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn snapshot_is_a_plain_array() {
        let snapshot = ProgressSnapshot::new(vec!["A".into(), "B".into()]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
        assert_eq!(ProgressSnapshot::from_json_str(&json).unwrap(), snapshot);
    }

    #[test]
    fn lenient_parse_recovers() {
        assert!(ProgressSnapshot::parse_lenient("{not json").is_empty());
        assert!(ProgressSnapshot::parse_lenient(r#"{"a": 1}"#).is_empty());
        assert!(ProgressSnapshot::parse_lenient("").is_empty());
        assert_eq!(
            ProgressSnapshot::parse_lenient(r#"["A", 3, null, "B"]"#).ids(),
            &["A", "B"]
        );
        assert!(ProgressSnapshot::from_json_str("{not json").is_err());
    }

    #[test]
    fn file_store_round_trip_and_recovery() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSnapshotStore::new(dir.path().join("nested/progress.json"));

        assert!(store.load().unwrap().is_empty());

        let snapshot = ProgressSnapshot::new(vec!["GCS301".into()]);
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);

        fs::write(store.path(), "garbage").unwrap();
        assert!(store.load().unwrap().is_empty());

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn memory_store() {
        let mut store = MemorySnapshotStore::with_content("[1, 2");
        assert!(store.load().unwrap().is_empty());

        store
            .save(&ProgressSnapshot::new(vec!["X".into()]))
            .unwrap();
        assert_eq!(store.load().unwrap().ids(), &["X"]);

        store.clear().unwrap();
        assert!(store.content().is_none());
    }
}
