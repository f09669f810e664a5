//! Coalescing debounce scheduler
//!
//! One pending timer per instance: scheduling while a timer is pending
//! aborts it and restarts the delay, so a burst of events runs the
//! enclosed action exactly once after the burst quiesces. Used by both
//! the remote-sync path and the resize coordinator.
//!
//! Timers are `LocalSet` tasks; the core runs on a current-thread
//! runtime and never needs `Send` futures.

use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct Debouncer {
    delay: Duration,
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: RefCell::new(None),
        }
    }

    /// Restart the quiet window; `action` runs once the window elapses
    /// without another `schedule` call.
    ///
    /// Must be called from within a [`tokio::task::LocalSet`].
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let handle = tokio::task::spawn_local(async move {
            sleep(delay).await;
            action().await;
        });
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use tokio::task::LocalSet;
    use tokio::time::{advance, sleep};

    const DELAY: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_action_once_with_last_value() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(DELAY);
                let fired = Rc::new(Cell::new(0u32));
                let last = Rc::new(Cell::new(0u32));

                for value in 1..=5 {
                    let fired = fired.clone();
                    let last = last.clone();
                    debouncer.schedule(move || async move {
                        fired.set(fired.get() + 1);
                        last.set(value);
                    });
                    advance(Duration::from_millis(10)).await;
                }

                sleep(DELAY * 2).await;
                assert_eq!(fired.get(), 1);
                assert_eq!(last.get(), 5);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(DELAY);
                let fired = Rc::new(Cell::new(false));

                let flag = fired.clone();
                debouncer.schedule(move || async move { flag.set(true) });
                debouncer.cancel();

                sleep(DELAY * 2).await;
                assert!(!fired.get());
                assert!(!debouncer.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_windows_fire_separately() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(DELAY);
                let fired = Rc::new(Cell::new(0u32));

                let count = fired.clone();
                debouncer.schedule(move || async move { count.set(count.get() + 1) });
                sleep(DELAY * 2).await;

                let count = fired.clone();
                debouncer.schedule(move || async move { count.set(count.get() + 1) });
                sleep(DELAY * 2).await;

                assert_eq!(fired.get(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_pending_tracks_timer() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(DELAY);
                assert!(!debouncer.is_pending());

                debouncer.schedule(|| async {});
                assert!(debouncer.is_pending());

                sleep(DELAY * 2).await;
                assert!(!debouncer.is_pending());
            })
            .await;
    }
}
