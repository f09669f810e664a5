//! Drag/point interaction controller
//!
//! State machine with at most one active drag: Idle → Dragging → Idle,
//! plus an explicit cancel transition. The whole machine is inert unless
//! edit mode is on. Mouse and touch input share this logic; callers
//! extract pointer coordinates from their platform events and hand over
//! plain [`Point`]s.
//!
//! On release, the controller reads back the position of *every*
//! draggable node and persists one complete snapshot keyed by the
//! current breakpoint. A save is never a partial patch.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::breakpoint::Breakpoint;
use crate::geometry;
use crate::store::LayoutStore;
use crate::types::{LayoutSnapshot, NodeId, NodePosition, Point, Rect};

/// View-tree collaborator: positional state of named visual nodes.
/// This core reads and writes node positions but does not own rendering.
pub trait NodeView {
    /// Bounding box of the diagram container
    fn container_rect(&self) -> Option<Rect>;

    /// Bounding box of one diagram node
    fn node_rect(&self, node: NodeId) -> Option<Rect>;

    /// Write a node's relative position fields
    fn set_node_position(&mut self, node: NodeId, position: &NodePosition);

    /// Toggle the node's "being dragged" visual marker
    fn set_dragging(&mut self, node: NodeId, active: bool);
}

#[derive(Debug)]
struct ActiveDrag {
    node: NodeId,
    pointer_start: Point,
    start_rect: Rect,
    container: Rect,
    /// Where the node sat before the drag, for cancel restore
    prior: NodePosition,
}

pub struct DragController {
    layout: Rc<LayoutStore>,
    breakpoint: Breakpoint,
    edit_mode: bool,
    active: Option<ActiveDrag>,
    on_move: Option<Box<dyn Fn()>>,
}

impl DragController {
    pub fn new(layout: Rc<LayoutStore>, breakpoint: Breakpoint) -> Self {
        Self {
            layout,
            breakpoint,
            edit_mode: false,
            active: None,
            on_move: None,
        }
    }

    /// Register the redraw signal fired on every applied move, so
    /// dependent visuals (flow lines) stay in sync with the drag.
    pub fn set_move_signal<F: Fn() + 'static>(&mut self, signal: F) {
        self.on_move = Some(Box::new(signal));
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle the edit-mode gate. Turning it off mid-drag cancels the
    /// drag rather than committing it.
    pub fn set_edit_mode(&mut self, on: bool, view: &mut impl NodeView) {
        if !on && self.active.is_some() {
            warn!("Edit mode disabled mid-drag, cancelling drag");
            self.cancel(view);
        }
        self.edit_mode = on;
        info!(edit_mode = on, "Edit mode toggled");
    }

    /// Record the breakpoint that subsequent releases persist under
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer/touch press on a node. Returns whether a drag started.
    pub fn pointer_down(&mut self, view: &mut impl NodeView, node: NodeId, pointer: Point) -> bool {
        if !self.edit_mode {
            debug!(node = node.as_str(), "Press ignored, edit mode is off");
            return false;
        }
        if self.active.is_some() {
            debug!(node = node.as_str(), "Press ignored, a drag is already active");
            return false;
        }

        let Some(container) = view.container_rect() else {
            warn!("No container box, cannot start drag");
            return false;
        };
        let Some(start_rect) = view.node_rect(node) else {
            warn!(node = node.as_str(), "No node box, cannot start drag");
            return false;
        };

        let origin = geometry::to_relative(container, Point::new(start_rect.x, start_rect.y));
        self.active = Some(ActiveDrag {
            node,
            pointer_start: pointer,
            start_rect,
            container,
            prior: NodePosition::pinned(origin.left, origin.top),
        });
        view.set_dragging(node, true);
        debug!(node = node.as_str(), "Drag started");
        true
    }

    /// Apply the current pointer position to the dragged node. The live
    /// position updates immediately, with no animation.
    pub fn pointer_move(&mut self, view: &mut impl NodeView, pointer: Point) {
        let Some(active) = &self.active else { return };

        let absolute = geometry::drag_position(
            active.container,
            active.start_rect,
            active.pointer_start,
            pointer,
        );
        let relative = geometry::to_relative(active.container, absolute);
        view.set_node_position(
            active.node,
            &NodePosition::pinned(relative.left, relative.top),
        );
        if let Some(signal) = &self.on_move {
            signal();
        }
    }

    /// Release: commit a complete snapshot of every node under the
    /// current breakpoint.
    pub fn pointer_up(&mut self, view: &mut impl NodeView) {
        let Some(active) = self.active.take() else { return };
        view.set_dragging(active.node, false);

        let container = view.container_rect().unwrap_or(active.container);
        let mut snapshot = LayoutSnapshot::new();
        for node in NodeId::ALL {
            let Some(rect) = view.node_rect(node) else {
                warn!(node = node.as_str(), "Node box missing during snapshot");
                continue;
            };
            let relative = geometry::to_relative(container, Point::new(rect.x, rect.y));
            snapshot.insert(node, NodePosition::pinned(relative.left, relative.top));
        }

        info!(
            node = active.node.as_str(),
            breakpoint = self.breakpoint.as_str(),
            "Drag committed"
        );
        self.layout.save(self.breakpoint, snapshot);
    }

    /// Abort the drag and put the node back where it started.
    pub fn cancel(&mut self, view: &mut impl NodeView) {
        let Some(active) = self.active.take() else { return };
        view.set_dragging(active.node, false);
        view.set_node_position(active.node, &active.prior);
        debug!(node = active.node.as_str(), "Drag cancelled");
    }

    /// Apply a stored snapshot to the view (used when a breakpoint's
    /// saved layout is loaded).
    pub fn apply_snapshot(view: &mut impl NodeView, snapshot: &LayoutSnapshot) {
        for (node, position) in snapshot.iter() {
            view.set_node_position(*node, position);
        }
    }
}
