//! Dual-tier tile configuration store
//!
//! One authoritative in-memory document, persisted to a remote store and
//! a local cache. Resolution order on startup is remote, else cache,
//! else synthesized default. Local mutations apply synchronously and are
//! immediately visible to reads and listeners; the remote tier is pushed
//! through a debounced write-back and is eventually consistent. A failed
//! remote sync is logged, never rolled back locally: the local tier is
//! always good enough to render from.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::constants::{debounce, storage};
use crate::debounce::Debouncer;
use crate::storage::{ConfigService, LocalStore};
use crate::tiles::{TileConfigDocument, TileDescriptor};
use crate::types::TileSide;

/// Caller-facing failures of the store's command surface
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("tile store has not finished initializing")]
    NotInitialized,
    #[error("no tile slot at {side:?}[{index}]")]
    InvalidSlot { side: TileSide, index: usize },
    #[error("invalid tile config payload: {0}")]
    MalformedImport(String),
    #[error("tile config could not be serialized: {0}")]
    Serialization(String),
}

pub type ListenerId = u64;

type Listener = Box<dyn Fn(&TileConfigDocument)>;

pub struct TileConfigStore {
    /// Single authoritative document; `None` until `initialize` resolves
    config: Rc<RefCell<Option<TileConfigDocument>>>,
    cache: Rc<dyn LocalStore>,
    remote: Rc<dyn ConfigService>,
    sync: Debouncer,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<ListenerId>,
}

impl TileConfigStore {
    pub fn new(cache: Rc<dyn LocalStore>, remote: Rc<dyn ConfigService>) -> Self {
        Self {
            config: Rc::new(RefCell::new(None)),
            cache,
            remote,
            sync: Debouncer::new(debounce::REMOTE_SYNC),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Resolve the initial document: remote store, else local cache,
    /// else the synthesized default. Idempotent; a second call performs
    /// no further fetch. Until this resolves, every mutation is rejected
    /// with [`StoreError::NotInitialized`].
    pub async fn initialize(&self) {
        if self.config.borrow().is_some() {
            debug!("Tile store already initialized, skipping fetch");
            return;
        }

        let resolved = match self.remote.fetch_tile_config().await {
            Ok(Some(mut document)) => {
                document.validate_and_clamp();
                info!("Adopted tile config from remote store");
                // Refresh the cache so the next offline start matches
                self.write_cache(&document);
                document
            }
            Ok(None) => {
                info!("Remote store holds no tile config, trying local cache");
                self.load_cached_or_default()
            }
            Err(e) => {
                warn!(error = %e, "Remote tile config fetch failed, trying local cache");
                self.load_cached_or_default()
            }
        };

        *self.config.borrow_mut() = Some(resolved);
    }

    fn load_cached_or_default(&self) -> TileConfigDocument {
        if let Some(raw) = self.cache.get(storage::TILE_CONFIG_KEY) {
            match serde_json::from_str::<TileConfigDocument>(&raw) {
                Ok(mut document) => {
                    document.validate_and_clamp();
                    info!("Loaded tile config from local cache");
                    return document;
                }
                Err(e) => {
                    warn!(error = %e, "Cached tile config is unreadable, ignoring it");
                }
            }
        }
        info!("No stored tile config, using default");
        TileConfigDocument::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.config.borrow().is_some()
    }

    /// Snapshot of the current document, if resolved
    pub fn config(&self) -> Option<TileConfigDocument> {
        self.config.borrow().clone()
    }

    /// Pure read; out-of-range index (or an empty slot) is absent.
    pub fn tile(&self, side: TileSide, index: usize) -> Option<TileDescriptor> {
        self.config
            .borrow()
            .as_ref()
            .and_then(|config| config.rail(side).get(index).cloned())
    }

    /// All slots of one rail, in order
    pub fn tiles(&self, side: TileSide) -> Vec<Option<TileDescriptor>> {
        self.config
            .borrow()
            .as_ref()
            .map(|config| config.rail(side).slots().to_vec())
            .unwrap_or_default()
    }

    /// Place (or clear, with `None`) the descriptor at one slot.
    pub fn set_tile(
        &self,
        side: TileSide,
        index: usize,
        descriptor: Option<TileDescriptor>,
    ) -> Result<(), StoreError> {
        let snapshot = {
            let mut guard = self.config.borrow_mut();
            let config = guard.as_mut().ok_or(StoreError::NotInitialized)?;
            if !config.rail_mut(side).set(index, descriptor) {
                return Err(StoreError::InvalidSlot { side, index });
            }
            config.clone()
        };
        debug!(side = side.as_str(), index, "Tile slot updated");
        self.commit(&snapshot);
        Ok(())
    }

    pub fn remove_tile(&self, side: TileSide, index: usize) -> Result<(), StoreError> {
        self.set_tile(side, index, None)
    }

    /// Set a rail's slot count, clamped to the supported range. Entries
    /// at indices below the new count keep their content and position.
    pub fn set_tile_count(&self, side: TileSide, count: usize) -> Result<usize, StoreError> {
        let (snapshot, clamped) = {
            let mut guard = self.config.borrow_mut();
            let config = guard.as_mut().ok_or(StoreError::NotInitialized)?;
            let clamped = config.set_count(side, count);
            (config.clone(), clamped)
        };
        info!(side = side.as_str(), count = clamped, "Rail resized");
        self.commit(&snapshot);
        Ok(clamped)
    }

    /// Flip whole-panel visibility; returns the new value.
    pub fn toggle_visibility(&self) -> Result<bool, StoreError> {
        let (snapshot, visible) = {
            let mut guard = self.config.borrow_mut();
            let config = guard.as_mut().ok_or(StoreError::NotInitialized)?;
            config.visible = !config.visible;
            (config.clone(), config.visible)
        };
        info!(visible, "Panel visibility toggled");
        self.commit(&snapshot);
        Ok(visible)
    }

    /// Serialize the full current document.
    pub fn export(&self) -> Result<String, StoreError> {
        let guard = self.config.borrow();
        let config = guard.as_ref().ok_or(StoreError::NotInitialized)?;
        serde_json::to_string(config).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Parse and adopt a full document. The payload is validated before
    /// anything is adopted: both rails must be array-shaped, otherwise
    /// the import is rejected and current state is left untouched.
    pub fn import(&self, raw: &str) -> Result<(), StoreError> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }

        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| StoreError::MalformedImport(e.to_string()))?;
        for rail in ["tiles_left", "tiles_right"] {
            if !value.get(rail).is_some_and(|v| v.is_array()) {
                return Err(StoreError::MalformedImport(format!(
                    "'{rail}' is missing or not an array"
                )));
            }
        }

        let mut document: TileConfigDocument = serde_json::from_value(value)
            .map_err(|e| StoreError::MalformedImport(e.to_string()))?;
        document.validate_and_clamp();

        *self.config.borrow_mut() = Some(document.clone());
        info!("Imported tile config document");
        self.commit(&document);
        Ok(())
    }

    /// Register a change listener. Listeners are invoked synchronously
    /// with the post-mutation document on every accepted mutation; they
    /// must not register or unregister listeners from inside the
    /// notification.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TileConfigDocument) + 'static,
    {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Common tail of every accepted mutation: cache synchronously,
    /// notify synchronously, then restart the remote sync window.
    fn commit(&self, config: &TileConfigDocument) {
        self.write_cache(config);
        for (_, listener) in self.listeners.borrow().iter() {
            listener(config);
        }
        self.schedule_sync();
    }

    fn write_cache(&self, config: &TileConfigDocument) {
        match serde_json::to_string(config) {
            Ok(raw) => self.cache.set(storage::TILE_CONFIG_KEY, &raw),
            Err(e) => error!(error = %e, "Failed to serialize tile config for cache"),
        }
    }

    /// Restart the sync quiet window. The task reads the live document
    /// when it fires, so only the newest state after a burst of edits is
    /// transmitted. Failures never touch local state; an in-flight call
    /// superseded at the remote tier is accepted as last-write-wins.
    fn schedule_sync(&self) {
        let config = Rc::clone(&self.config);
        let remote = Rc::clone(&self.remote);
        self.sync.schedule(move || async move {
            let document = config.borrow().clone();
            let Some(document) = document else { return };
            debug!("Pushing tile config to remote store");
            if let Err(e) = remote.save_tile_config(&document).await {
                warn!(error = %e, "Remote tile config sync failed, keeping local state");
            }
        });
    }
}
