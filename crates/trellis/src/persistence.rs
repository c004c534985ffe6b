//! Topic snapshots.
//!
//! A snapshot is the JSON form of a [`Topic`]. Loading always validates the
//! snapshot before handing it out.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{error::TrellisError, topic::Topic};

/// Somewhere a topic snapshot can be saved to and loaded from.
pub trait TopicStore {
    /// Load and validate the stored topic.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored, the snapshot cannot be read or
    /// parsed, or the topic it holds is invalid.
    fn load(&self) -> Result<Topic, TrellisError>;

    /// Store a topic, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, topic: &Topic) -> Result<(), TrellisError>;
}

/// Render a topic as a pretty-printed JSON snapshot.
pub fn to_snapshot(topic: &Topic) -> Result<String, TrellisError> {
    Ok(serde_json::to_string_pretty(topic)?)
}

/// Parse and validate a JSON snapshot.
pub fn from_snapshot(snapshot: &str) -> Result<Topic, TrellisError> {
    let topic: Topic = serde_json::from_str(snapshot)?;
    topic.validate()?;
    Ok(topic)
}

/// Stores a topic as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot file exists yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TopicStore for JsonFileStore {
    fn load(&self) -> Result<Topic, TrellisError> {
        debug!(path:? = self.path; "Loading topic");
        let snapshot = fs::read_to_string(&self.path)?;
        let topic = from_snapshot(&snapshot)?;
        info!(path:? = self.path, diagrams = topic.diagrams().count(); "Topic loaded");
        Ok(topic)
    }

    fn save(&self, topic: &Topic) -> Result<(), TrellisError> {
        let snapshot = to_snapshot(topic)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, snapshot)?;
        info!(path:? = self.path; "Topic saved");
        Ok(())
    }
}

/// Keeps the latest snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON of the latest snapshot.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }
}

impl TopicStore for MemoryStore {
    fn load(&self) -> Result<Topic, TrellisError> {
        let snapshot = self.snapshot.borrow();
        let snapshot = snapshot
            .as_deref()
            .ok_or_else(|| TrellisError::not_found("stored topic snapshot"))?;
        from_snapshot(snapshot)
    }

    fn save(&self, topic: &Topic) -> Result<(), TrellisError> {
        let snapshot = to_snapshot(topic)?;
        *self.snapshot.borrow_mut() = Some(snapshot);
        Ok(())
    }
}
