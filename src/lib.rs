#![forbid(unsafe_code)]

//! Dashboard customization core for a browser-resident energy panel
//!
//! Two kinds of user customization are captured, persisted, and
//! restored here: which live-metric tiles appear in the two side rails,
//! and where the energy-flow diagram's nodes sit on screen, per
//! responsive breakpoint. Tile configuration lives in a dual-tier store
//! (remote authority with a local cache fallback); node layouts are
//! saved wholesale per breakpoint. Rendering, metric formatting, and
//! the flow diagram's own drawing belong to the host and are reached
//! through the traits in [`storage`], [`entity`], and [`drag`].
//!
//! The core is single-threaded and event-driven: it expects a
//! current-thread tokio runtime with a `LocalSet` for its debounced
//! persistence tasks.

pub mod breakpoint;
pub mod constants;
pub mod debounce;
pub mod drag;
pub mod entity;
pub mod geometry;
pub mod resize;
pub mod storage;
pub mod store;
pub mod tiles;
pub mod types;

// Re-export commonly used types
pub use breakpoint::Breakpoint;
pub use debounce::Debouncer;
pub use drag::{DragController, NodeView};
pub use entity::{EntityProvider, EntityState, ResolvedTile, TileContent};
pub use resize::{RedrawEvent, ResizeCoordinator};
pub use storage::{ConfigService, FileStore, LocalStore, MemoryStore};
pub use store::{LayoutStore, ListenerId, StoreError, TileConfigStore};
pub use tiles::{Rail, SupportEntities, TileAction, TileConfigDocument, TileDescriptor};
pub use types::{
    LayoutSnapshot, NodeId, NodePosition, Point, Rect, TilePosition, TileSide, Viewport,
};
