//! Resize/redraw coordination
//!
//! Converts noisy high-frequency viewport-resize signals into few
//! meaningful layout re-evaluations. Raw signals restart a debounce
//! timer; when it fires, the breakpoint is reclassified and the new
//! dimensions are compared to the last notified ones using asymmetric
//! thresholds. The height threshold is much larger than the width one:
//! mobile browser chrome showing and hiding produces spurious
//! height-only resizes that must not trigger redraws, while a genuine
//! rotation or window resize still does.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::breakpoint::Breakpoint;
use crate::constants::{debounce, resize};
use crate::debounce::Debouncer;
use crate::store::LayoutStore;
use crate::types::{LayoutSnapshot, Viewport};

/// One redraw notification, at most one per debounce cycle
#[derive(Debug, Clone)]
pub struct RedrawEvent {
    pub viewport: Viewport,
    pub breakpoint: Breakpoint,
    pub breakpoint_changed: bool,
    /// Saved layout for the new breakpoint, present only when the
    /// breakpoint changed and a snapshot exists (otherwise the nodes
    /// stay unpositioned / as they are)
    pub layout: Option<LayoutSnapshot>,
}

type RedrawListener = Box<dyn Fn(&RedrawEvent)>;

struct State {
    last_viewport: Viewport,
    last_breakpoint: Breakpoint,
}

struct Inner {
    layout: Rc<LayoutStore>,
    state: RefCell<State>,
    listeners: RefCell<Vec<RedrawListener>>,
}

impl Inner {
    /// Decide whether the settled viewport warrants a redraw. The
    /// last-seen dimensions only advance when a notification fires, so
    /// gradual sub-threshold drift still accumulates into one.
    fn evaluate(&self, viewport: Viewport) -> Option<RedrawEvent> {
        let breakpoint = Breakpoint::classify(viewport.width);
        let mut state = self.state.borrow_mut();

        let breakpoint_changed = breakpoint != state.last_breakpoint;
        let width_delta = viewport.width.abs_diff(state.last_viewport.width);
        let height_delta = viewport.height.abs_diff(state.last_viewport.height);
        let threshold_crossed = width_delta >= resize::WIDTH_THRESHOLD
            || height_delta >= resize::HEIGHT_THRESHOLD;

        if breakpoint_changed {
            state.last_breakpoint = breakpoint;
        }

        if !breakpoint_changed && !threshold_crossed {
            debug!(width_delta, height_delta, "Resize below thresholds, suppressed");
            return None;
        }

        state.last_viewport = viewport;
        drop(state);

        let layout = if breakpoint_changed {
            info!(breakpoint = breakpoint.as_str(), "Breakpoint changed");
            self.layout.load(breakpoint)
        } else {
            None
        };

        Some(RedrawEvent {
            viewport,
            breakpoint,
            breakpoint_changed,
            layout,
        })
    }

    fn evaluate_and_notify(&self, viewport: Viewport) {
        if let Some(event) = self.evaluate(viewport) {
            for listener in self.listeners.borrow().iter() {
                listener(&event);
            }
        }
    }
}

pub struct ResizeCoordinator {
    inner: Rc<Inner>,
    debounce: Debouncer,
}

impl ResizeCoordinator {
    pub fn new(layout: Rc<LayoutStore>, initial: Viewport) -> Self {
        Self {
            inner: Rc::new(Inner {
                layout,
                state: RefCell::new(State {
                    last_viewport: initial,
                    last_breakpoint: Breakpoint::classify(initial.width),
                }),
                listeners: RefCell::new(Vec::new()),
            }),
            debounce: Debouncer::new(debounce::RESIZE),
        }
    }

    pub fn current_breakpoint(&self) -> Breakpoint {
        self.inner.state.borrow().last_breakpoint
    }

    /// Subscribe to redraw notifications
    pub fn on_redraw<F>(&self, listener: F)
    where
        F: Fn(&RedrawEvent) + 'static,
    {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Feed one raw resize signal. Restarts the debounce window; the
    /// evaluation runs once the signals quiesce.
    ///
    /// Must be called from within a [`tokio::task::LocalSet`].
    pub fn note_resize(&self, viewport: Viewport) {
        let inner = Rc::clone(&self.inner);
        self.debounce.schedule(move || async move {
            inner.evaluate_and_notify(viewport);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::time::Duration;

    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use crate::storage::MemoryStore;
    use crate::types::{NodeId, NodePosition};

    const SETTLE: Duration = Duration::from_millis(1000);

    fn coordinator(initial: Viewport) -> (ResizeCoordinator, Rc<LayoutStore>) {
        let layout = Rc::new(LayoutStore::new(Rc::new(MemoryStore::new())));
        (
            ResizeCoordinator::new(Rc::clone(&layout), initial),
            layout,
        )
    }

    fn count_redraws(coordinator: &ResizeCoordinator) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&count);
        coordinator.on_redraw(move |_| counter.set(counter.get() + 1));
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_threshold_noise_is_suppressed() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1000, 800));
                let redraws = count_redraws(&coordinator);

                // Browser chrome show/hide: height-only wobble, tiny width jitter
                coordinator.note_resize(Viewport::new(1010, 900));
                sleep(SETTLE).await;

                assert_eq!(redraws.get(), 0);
                assert_eq!(coordinator.current_breakpoint(), Breakpoint::Tablet);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_width_change_at_threshold_fires_exactly_once() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1000, 800));
                let redraws = count_redraws(&coordinator);

                coordinator.note_resize(Viewport::new(976, 800)); // dw = 24
                sleep(SETTLE).await;

                assert_eq!(redraws.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_height_change_needs_much_larger_delta() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1000, 800));
                let redraws = count_redraws(&coordinator);

                coordinator.note_resize(Viewport::new(1000, 920)); // dh = 120, suppressed
                sleep(SETTLE).await;
                assert_eq!(redraws.get(), 0);

                coordinator.note_resize(Viewport::new(1000, 1000)); // dh = 200 vs last-seen 800
                sleep(SETTLE).await;
                assert_eq!(redraws.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_burst_coalesces_to_one_evaluation() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1000, 800));
                let redraws = count_redraws(&coordinator);

                for width in [990, 950, 900, 850, 600] {
                    coordinator.note_resize(Viewport::new(width, 800));
                    sleep(Duration::from_millis(50)).await;
                }
                sleep(SETTLE).await;

                assert_eq!(redraws.get(), 1);
                assert_eq!(coordinator.current_breakpoint(), Breakpoint::Mobile);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_breakpoint_change_loads_saved_layout() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, layout) = coordinator(Viewport::new(1200, 800));
                let mut snapshot = LayoutSnapshot::new();
                snapshot.insert(NodeId::Battery, NodePosition::pinned(50.0, 20.0));
                layout.save(Breakpoint::Tablet, snapshot);

                let seen = Rc::new(RefCell::new(Vec::new()));
                let sink = Rc::clone(&seen);
                coordinator.on_redraw(move |event: &RedrawEvent| {
                    sink.borrow_mut().push(event.clone());
                });

                coordinator.note_resize(Viewport::new(800, 800));
                sleep(SETTLE).await;

                let events = seen.borrow();
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].breakpoint, Breakpoint::Tablet);
                assert!(events[0].breakpoint_changed);
                let battery = events[0].layout.as_ref().unwrap().get(NodeId::Battery).unwrap();
                assert_eq!(battery.left, Some(50.0));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_breakpoint_change_without_saved_layout_leaves_unpositioned() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1200, 800));

                let seen = Rc::new(RefCell::new(Vec::new()));
                let sink = Rc::clone(&seen);
                coordinator.on_redraw(move |event: &RedrawEvent| {
                    sink.borrow_mut().push(event.clone());
                });

                coordinator.note_resize(Viewport::new(500, 800));
                sleep(SETTLE).await;

                let events = seen.borrow();
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].breakpoint, Breakpoint::Mobile);
                assert!(events[0].layout.is_none());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_threshold_drift_accumulates() {
        LocalSet::new()
            .run_until(async {
                let (coordinator, _) = coordinator(Viewport::new(1000, 800));
                let redraws = count_redraws(&coordinator);

                // Each step is below the width threshold on its own, but
                // last-seen only advances on a fired notification
                coordinator.note_resize(Viewport::new(990, 800)); // dw = 10
                sleep(SETTLE).await;
                assert_eq!(redraws.get(), 0);

                coordinator.note_resize(Viewport::new(975, 800)); // dw = 25 vs 1000
                sleep(SETTLE).await;
                assert_eq!(redraws.get(), 1);
            })
            .await;
    }
}
