//! Session-local copies of unsaved document text
//!
//! Drafts let an editing session survive a restart: every edit stores the
//! current text under [`draft_key`], and loading a document compares the
//! stored draft with the text read from storage.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{error, warn};

use crate::constants::DRAFT_KEY_PREFIX;

/// Key-value cache holding drafts
///
/// Writes are best effort; a cache that cannot persist logs the failure and
/// keeps going.
pub trait DraftCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, text: &str);
    fn remove(&mut self, key: &str);
}

/// Draft key for a document name
pub fn draft_key(document: &str) -> String {
    format!("{}{}", DRAFT_KEY_PREFIX, document)
}

/// Drafts kept only for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftCache {
    entries: HashMap<String, String>,
}

impl MemoryDraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DraftCache for MemoryDraftCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, text: &str) {
        self.entries.insert(key.to_string(), text.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Drafts persisted as one JSON object in a file
#[derive(Debug, Clone)]
pub struct JsonFileDraftCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileDraftCache {
    /// Open the cache file, starting empty when it is missing or unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt draft file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read draft file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            error!("Failed to persist drafts to {}: {}", self.path.display(), e);
        }
    }
}

impl DraftCache for JsonFileDraftCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, text: &str) {
        self.entries.insert(key.to_string(), text.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key() {
        assert_eq!(draft_key("main.ini"), "ini-editor-draft-main.ini");
    }

    #[test]
    fn test_memory_cache() {
        let mut cache = MemoryDraftCache::new();
        cache.set("k", "v");
        assert_eq!(cache.get("k").as_deref(), Some("v"));
        cache.remove("k");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_json_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");

        let mut cache = JsonFileDraftCache::open(&path);
        cache.set(&draft_key("a.ini"), "[custom]\na=1");
        cache.set("other", "x");
        cache.remove("other");

        let reopened = JsonFileDraftCache::open(&path);
        assert_eq!(reopened.get(&draft_key("a.ini")).as_deref(), Some("[custom]\na=1"));
        assert_eq!(reopened.get("other"), None);
    }

    #[test]
    fn test_json_cache_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, "not json").unwrap();
        let cache = JsonFileDraftCache::open(&path);
        assert_eq!(cache.get("anything"), None);
    }
}
