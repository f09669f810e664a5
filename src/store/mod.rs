//! Customization state stores
//!
//! This module provides the two persisted aggregates:
//! - **tile_config**: the dual-tier tile configuration store (remote
//!   authority + local cache, debounced write-back)
//! - **layout**: per-breakpoint diagram node layouts, local-cache backed

pub mod layout;
pub mod tile_config;

// Re-export commonly used types
pub use layout::LayoutStore;
pub use tile_config::{ListenerId, StoreError, TileConfigStore};
