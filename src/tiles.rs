//! Tile descriptors, rails, and the persisted tile config document
//!
//! A rail is a fixed-capacity ordered sequence of optional tile
//! descriptors. `Rail` is the invariant-enforcing slot model: rail
//! length always equals the configured count, access is bounds-checked,
//! and it is the sole choke point through which the config store
//! mutates slots.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::rails;
use crate::types::TileSide;

/// Service action performed by a button tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileAction {
    Toggle,
    TurnOn,
    TurnOff,
}

/// Secondary entity references shown in a tile's corners
///
/// Serialized with explicit nulls so the persisted document keeps the
/// same shape whether or not the corners are populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SupportEntities {
    #[serde(default)]
    pub top_right: Option<String>,
    #[serde(default)]
    pub bottom_right: Option<String>,
}

/// What one customizable tile displays or does
///
/// `entity_id` need not resolve at save time; resolution is checked at
/// render time (see the `entity` module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileDescriptor {
    Entity {
        entity_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        color: String,
        #[serde(default)]
        support_entities: SupportEntities,
    },
    Button {
        entity_id: String,
        action: TileAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        color: String,
        #[serde(default)]
        support_entities: SupportEntities,
    },
}

impl TileDescriptor {
    /// The primary entity reference this tile points at
    pub fn entity_id(&self) -> &str {
        match self {
            TileDescriptor::Entity { entity_id, .. } => entity_id,
            TileDescriptor::Button { entity_id, .. } => entity_id,
        }
    }
}

/// One fixed-capacity ordered slot sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rail {
    slots: Vec<Option<TileDescriptor>>,
}

impl Default for Rail {
    fn default() -> Self {
        Self::with_capacity(rails::MAX_TILES_PER_SIDE)
    }
}

impl Rail {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bounds-checked read; out-of-range is absent, never a panic.
    pub fn get(&self, index: usize) -> Option<&TileDescriptor> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Bounds-checked write. Returns false (and mutates nothing) when
    /// the index is outside the rail.
    pub fn set(&mut self, index: usize, descriptor: Option<TileDescriptor>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = descriptor;
                true
            }
            None => false,
        }
    }

    /// Truncate trailing slots or null-pad to the new length. Indices
    /// below the new length keep their content and position.
    pub fn resize(&mut self, count: usize) {
        self.slots.resize(count, None);
    }

    pub fn slots(&self) -> &[Option<TileDescriptor>] {
        &self.slots
    }
}

fn default_rail() -> Rail {
    Rail::default()
}

fn default_count() -> usize {
    rails::MAX_TILES_PER_SIDE
}

fn default_visible() -> bool {
    true
}

fn default_version() -> u32 {
    rails::CONFIG_VERSION
}

/// Root aggregate persisted to both storage tiers
///
/// `version` is a forward-compat marker only; it plays no part in
/// concurrency control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileConfigDocument {
    #[serde(default = "default_rail")]
    pub tiles_left: Rail,
    #[serde(default = "default_rail")]
    pub tiles_right: Rail,
    #[serde(default = "default_count")]
    pub left_count: usize,
    #[serde(default = "default_count")]
    pub right_count: usize,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Default for TileConfigDocument {
    fn default() -> Self {
        Self {
            tiles_left: default_rail(),
            tiles_right: default_rail(),
            left_count: default_count(),
            right_count: default_count(),
            visible: default_visible(),
            version: default_version(),
        }
    }
}

impl TileConfigDocument {
    pub fn rail(&self, side: TileSide) -> &Rail {
        match side {
            TileSide::Left => &self.tiles_left,
            TileSide::Right => &self.tiles_right,
        }
    }

    pub fn rail_mut(&mut self, side: TileSide) -> &mut Rail {
        match side {
            TileSide::Left => &mut self.tiles_left,
            TileSide::Right => &mut self.tiles_right,
        }
    }

    pub fn count(&self, side: TileSide) -> usize {
        match side {
            TileSide::Left => self.left_count,
            TileSide::Right => self.right_count,
        }
    }

    /// Set a rail's configured count, resizing the rail to match.
    /// The count is clamped into [0, MAX_TILES_PER_SIDE].
    pub fn set_count(&mut self, side: TileSide, count: usize) -> usize {
        let clamped = count.min(rails::MAX_TILES_PER_SIDE);
        if clamped != count {
            warn!(side = side.as_str(), requested = count, clamped, "tile count exceeds maximum, clamping");
        }
        match side {
            TileSide::Left => self.left_count = clamped,
            TileSide::Right => self.right_count = clamped,
        }
        self.rail_mut(side).resize(clamped);
        clamped
    }

    /// Validate and clamp a loaded document to safe shape.
    ///
    /// Called after parsing either persistence tier, so a hand-edited or
    /// stale document can never violate the slot-model invariant.
    pub fn validate_and_clamp(&mut self) {
        for side in [TileSide::Left, TileSide::Right] {
            let count = self.count(side);
            if count > rails::MAX_TILES_PER_SIDE {
                warn!(side = side.as_str(), count, max = rails::MAX_TILES_PER_SIDE, "stored tile count exceeds maximum, clamping");
                self.set_count(side, rails::MAX_TILES_PER_SIDE);
            }
            let count = self.count(side);
            if self.rail(side).len() != count {
                warn!(side = side.as_str(), rail_len = self.rail(side).len(), count, "rail length disagrees with count, normalizing");
                self.rail_mut(side).resize(count);
            }
        }
    }
}
