//! # minirelay-adapter-timer-tokio
//!
//! [`Timer`] port implementation spawning one local task per armed timer.
//!
//! Callbacks are `!Send`, so every timer runs on the current
//! [`tokio::task::LocalSet`]; arming outside a `LocalSet` panics.
//!
//! ## Dependency rule
//! Depends on `minirelay-app` (for port traits) and `minirelay-domain` (for domain types).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use minirelay_app::ports::{Timer, TimerCallback};
use minirelay_domain::id::TimerId;
use tokio::task::JoinHandle;

type Pending = Rc<RefCell<HashMap<TimerId, JoinHandle<()>>>>;

/// One-shot timers backed by `tokio::time::sleep`.
#[derive(Default)]
pub struct TokioTimer {
    next_id: Cell<u64>,
    pending: Pending,
}

impl TokioTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers armed and not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Timer for TokioTimer {
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId::new(self.next_id.get());
        self.next_id.set(id.get() + 1);

        let pending = Rc::clone(&self.pending);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            pending.borrow_mut().remove(&id);
            tracing::trace!(timer_id = %id, "timer fired");
            callback();
        });
        self.pending.borrow_mut().insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self.pending.borrow_mut().remove(&id) {
            handle.abort();
            tracing::trace!(timer_id = %id, "timer cancelled");
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for (_, handle) in self.pending.borrow_mut().drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    fn flag() -> (Rc<Cell<u32>>, TimerCallback) {
        let fired = Rc::new(Cell::new(0));
        let sink = Rc::clone(&fired);
        (fired, Box::new(move || sink.set(sink.get() + 1)))
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_after_delay() {
        LocalSet::new()
            .run_until(async {
                let timer = TokioTimer::new();
                let (fired, callback) = flag();
                timer.arm(Duration::from_secs(5), callback);

                tokio::time::sleep(Duration::from_secs(4)).await;
                assert_eq!(fired.get(), 0);
                assert_eq!(timer.pending(), 1);

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert_eq!(fired.get(), 1);
                assert_eq!(timer.pending(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_when_cancelled() {
        LocalSet::new()
            .run_until(async {
                let timer = TokioTimer::new();
                let (fired, callback) = flag();
                let id = timer.arm(Duration::from_secs(1), callback);
                timer.cancel(id);

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert_eq!(fired.get(), 0);
                assert_eq!(timer.pending(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_only_cancel_the_given_timer() {
        LocalSet::new()
            .run_until(async {
                let timer = TokioTimer::new();
                let (first, cb1) = flag();
                let (second, cb2) = flag();
                let id = timer.arm(Duration::from_secs(1), cb1);
                timer.arm(Duration::from_secs(1), cb2);
                timer.cancel(id);

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert_eq!(first.get(), 0);
                assert_eq!(second.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_cancel_after_firing() {
        LocalSet::new()
            .run_until(async {
                let timer = TokioTimer::new();
                let (fired, callback) = flag();
                let id = timer.arm(Duration::from_millis(10), callback);

                tokio::time::sleep(Duration::from_millis(20)).await;
                timer.cancel(id);
                assert_eq!(fired.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_abort_pending_timers_on_drop() {
        LocalSet::new()
            .run_until(async {
                let timer = TokioTimer::new();
                let (fired, callback) = flag();
                timer.arm(Duration::from_secs(1), callback);
                drop(timer);

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert_eq!(fired.get(), 0);
            })
            .await;
    }
}
