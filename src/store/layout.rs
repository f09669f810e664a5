//! Per-breakpoint node layout persistence
//!
//! Each breakpoint owns an independent serialized snapshot document
//! under its own storage key. Snapshots are overwritten wholesale on
//! every save; an in-memory map fronts the local store so repeated
//! breakpoint switches don't re-parse.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{error, info, warn};

use crate::breakpoint::Breakpoint;
use crate::constants::storage;
use crate::storage::LocalStore;
use crate::types::LayoutSnapshot;

const ALL_BREAKPOINTS: [Breakpoint; 3] =
    [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

fn key_for(breakpoint: Breakpoint) -> String {
    format!("{}{}", storage::LAYOUT_KEY_PREFIX, breakpoint.as_str())
}

pub struct LayoutStore {
    cache: Rc<dyn LocalStore>,
    loaded: RefCell<HashMap<Breakpoint, LayoutSnapshot>>,
}

impl LayoutStore {
    pub fn new(cache: Rc<dyn LocalStore>) -> Self {
        Self {
            cache,
            loaded: RefCell::new(HashMap::new()),
        }
    }

    /// Load the snapshot saved for a breakpoint, if any.
    ///
    /// A corrupt cached document is logged and treated as absent.
    pub fn load(&self, breakpoint: Breakpoint) -> Option<LayoutSnapshot> {
        if let Some(snapshot) = self.loaded.borrow().get(&breakpoint) {
            return Some(snapshot.clone());
        }

        let raw = self.cache.get(&key_for(breakpoint))?;
        match serde_json::from_str::<LayoutSnapshot>(&raw) {
            Ok(snapshot) => {
                self.loaded
                    .borrow_mut()
                    .insert(breakpoint, snapshot.clone());
                Some(snapshot)
            }
            Err(e) => {
                warn!(breakpoint = breakpoint.as_str(), error = %e, "Stored layout is unreadable, ignoring it");
                None
            }
        }
    }

    /// Overwrite the breakpoint's snapshot with a complete new one.
    pub fn save(&self, breakpoint: Breakpoint, snapshot: LayoutSnapshot) {
        match serde_json::to_string(&snapshot) {
            Ok(raw) => self.cache.set(&key_for(breakpoint), &raw),
            Err(e) => {
                error!(breakpoint = breakpoint.as_str(), error = %e, "Failed to serialize layout snapshot");
                return;
            }
        }
        info!(breakpoint = breakpoint.as_str(), nodes = snapshot.len(), "Saved layout snapshot");
        self.loaded.borrow_mut().insert(breakpoint, snapshot);
    }

    /// Clear every breakpoint's saved snapshot.
    pub fn reset(&self) {
        for breakpoint in ALL_BREAKPOINTS {
            self.cache.remove(&key_for(breakpoint));
        }
        self.loaded.borrow_mut().clear();
        info!("Cleared saved layouts for every breakpoint");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::MemoryStore;
    use crate::types::{NodeId, NodePosition};

    fn snapshot_with(node: NodeId, left: f64) -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot::new();
        snapshot.insert(node, NodePosition::pinned(left, 10.0));
        snapshot
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = LayoutStore::new(Rc::new(MemoryStore::new()));
        let snapshot = snapshot_with(NodeId::Battery, 55.0);

        store.save(Breakpoint::Tablet, snapshot.clone());
        assert_eq!(store.load(Breakpoint::Tablet), Some(snapshot));
    }

    #[test]
    fn test_breakpoints_are_independent() {
        let store = LayoutStore::new(Rc::new(MemoryStore::new()));
        store.save(Breakpoint::Tablet, snapshot_with(NodeId::Battery, 55.0));

        assert!(store.load(Breakpoint::Mobile).is_none());
        assert!(store.load(Breakpoint::Desktop).is_none());
    }

    #[test]
    fn test_load_falls_back_to_cache_tier() {
        let cache: Rc<dyn LocalStore> = Rc::new(MemoryStore::new());
        let snapshot = snapshot_with(NodeId::Solar, 12.0);

        let first = LayoutStore::new(Rc::clone(&cache));
        first.save(Breakpoint::Mobile, snapshot.clone());

        // A fresh store over the same cache has no in-memory entry
        let second = LayoutStore::new(cache);
        assert_eq!(second.load(Breakpoint::Mobile), Some(snapshot));
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let store = LayoutStore::new(Rc::new(MemoryStore::new()));
        store.save(Breakpoint::Desktop, snapshot_with(NodeId::Battery, 10.0));
        store.save(Breakpoint::Desktop, snapshot_with(NodeId::Grid, 90.0));

        let loaded = store.load(Breakpoint::Desktop).unwrap();
        assert!(loaded.get(NodeId::Battery).is_none());
        assert_eq!(loaded.get(NodeId::Grid).unwrap().left, Some(90.0));
    }

    #[test]
    fn test_corrupt_cache_entry_is_treated_as_absent() {
        let cache = Rc::new(MemoryStore::new());
        cache.set(&key_for(Breakpoint::Mobile), "not json at all");

        let store = LayoutStore::new(cache);
        assert!(store.load(Breakpoint::Mobile).is_none());
    }

    #[test]
    fn test_reset_clears_all_breakpoints() {
        let cache: Rc<dyn LocalStore> = Rc::new(MemoryStore::new());
        let store = LayoutStore::new(Rc::clone(&cache));
        store.save(Breakpoint::Mobile, snapshot_with(NodeId::House, 40.0));
        store.save(Breakpoint::Desktop, snapshot_with(NodeId::House, 60.0));

        store.reset();
        assert!(store.load(Breakpoint::Mobile).is_none());
        assert!(store.load(Breakpoint::Desktop).is_none());
        assert!(cache.get(&key_for(Breakpoint::Mobile)).is_none());
    }
}
