//! Render-time entity resolution
//!
//! Tile descriptors store entity references that are not required to
//! resolve at save time; entities can vanish independently of this
//! core. Resolution happens when a tile is rendered, and a dangling
//! reference yields an explicit placeholder, never a panic.

use tracing::warn;

use crate::tiles::TileDescriptor;

/// Live value and metadata for one entity, as exposed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub state: String,
    pub unit: Option<String>,
    pub friendly_name: Option<String>,
}

/// Read-only lookup of live entity state, owned by the surrounding app
pub trait EntityProvider {
    fn lookup(&self, entity_id: &str) -> Option<EntityState>;
}

/// What a tile renders for one entity reference
#[derive(Debug, Clone, PartialEq)]
pub enum TileContent {
    Live { entity_id: String, state: EntityState },
    /// Error placeholder for a reference that no longer resolves
    Unavailable { entity_id: String },
}

impl TileContent {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TileContent::Unavailable { .. })
    }
}

/// Fully resolved render content for one tile
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTile {
    pub primary: TileContent,
    pub top_right: Option<TileContent>,
    pub bottom_right: Option<TileContent>,
}

fn resolve_ref(entity_id: &str, provider: &dyn EntityProvider) -> TileContent {
    match provider.lookup(entity_id) {
        Some(state) => TileContent::Live {
            entity_id: entity_id.to_string(),
            state,
        },
        None => {
            warn!(entity_id, "Entity reference no longer resolves, rendering placeholder");
            TileContent::Unavailable {
                entity_id: entity_id.to_string(),
            }
        }
    }
}

/// Resolve a descriptor's primary and support references against the
/// live entity provider.
pub fn resolve_tile(descriptor: &TileDescriptor, provider: &dyn EntityProvider) -> ResolvedTile {
    let support = match descriptor {
        TileDescriptor::Entity { support_entities, .. } => support_entities,
        TileDescriptor::Button { support_entities, .. } => support_entities,
    };

    ResolvedTile {
        primary: resolve_ref(descriptor.entity_id(), provider),
        top_right: support
            .top_right
            .as_deref()
            .map(|id| resolve_ref(id, provider)),
        bottom_right: support
            .bottom_right
            .as_deref()
            .map(|id| resolve_ref(id, provider)),
    }
}
