//! Shared value types used across the customization core.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which of the two tile rails a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSide {
    Left,
    Right,
}

impl TileSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileSide::Left => "left",
            TileSide::Right => "right",
        }
    }
}

/// Identifies a single tile slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePosition {
    pub side: TileSide,
    pub index: usize,
}

impl TilePosition {
    pub fn new(side: TileSide, index: usize) -> Self {
        Self { side, index }
    }
}

/// Draggable nodes of the energy-flow diagram
///
/// The variant names double as storage keys and view selectors, so they
/// must stay stable across releases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeId {
    Solar,
    Grid,
    Battery,
    House,
    Inverter,
}

impl NodeId {
    /// Every diagram node, in snapshot order
    pub const ALL: [NodeId; 5] = [
        NodeId::Solar,
        NodeId::Grid,
        NodeId::Battery,
        NodeId::House,
        NodeId::Inverter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Solar => "solar",
            NodeId::Grid => "grid",
            NodeId::Battery => "battery",
            NodeId::House => "house",
            NodeId::Inverter => "inverter",
        }
    }
}

/// Pointer coordinates in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Viewport dimensions as reported by the host view tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Relative placement of one diagram node
///
/// All fields are percentages of the container except `transform`, which
/// carries the raw transform override. Any axis may be unset; the view
/// keeps whatever styling it had for unset axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodePosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl NodePosition {
    /// Placement pinned by top/left percentages, overriding any default
    /// centering transform the diagram applies.
    pub fn pinned(left: f64, top: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            right: None,
            bottom: None,
            transform: Some("none".to_string()),
        }
    }
}

/// Complete set of node placements for one breakpoint
///
/// Saved and loaded as a single unit; a snapshot is never a partial
/// patch on top of another snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutSnapshot {
    positions: BTreeMap<NodeId, NodePosition>,
}

impl LayoutSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodePosition> {
        self.positions.get(&node)
    }

    pub fn insert(&mut self, node: NodeId, position: NodePosition) {
        self.positions.insert(node, position);
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodePosition)> {
        self.positions.iter()
    }
}
