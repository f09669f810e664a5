//! Persistence tier contracts and implementations
//!
//! Two tiers back the customization state: a local key-value cache that
//! is synchronous and always good enough to render from, and a remote
//! authoritative store reached through an async service contract. Local
//! store failures are caught and logged inside the implementation;
//! callers never see them (a broken cache must not take down the
//! dashboard).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, warn};

use crate::constants::storage;
use crate::tiles::TileConfigDocument;

/// Local persistent key-value store, synchronous from the caller's view
pub trait LocalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Client-side contract of the remote authoritative store
///
/// `fetch` returns the stored document or absence; `save` accepts a full
/// document (whole-document overwrite, no partial-field updates).
#[async_trait(?Send)]
pub trait ConfigService {
    async fn fetch_tile_config(&self) -> Result<Option<TileConfigDocument>>;
    async fn save_tile_config(&self, document: &TileConfigDocument) -> Result<()>;
}

/// File-backed local store, one JSON file per key under the user config dir
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        let mut root = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push(storage::APP_DIR);
        Self { root }
    }

    /// Store rooted at an explicit directory (embedding and tests)
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.root) {
            error!(path = %self.root.display(), error = %e, "Failed to create local store directory");
            return;
        }
        let path = self.path_for(key);
        if let Err(e) = fs::write(&path, value) {
            error!(path = %path.display(), error = %e, "Failed to write local store entry");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to remove local store entry");
            }
        }
    }
}

/// In-memory store for tests and hosts with their own persistence
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
