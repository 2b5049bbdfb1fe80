//! Timer port — one-shot delayed callbacks on the dispatch thread.

use std::time::Duration;

use minirelay_domain::id::TimerId;

/// Work to run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Schedules one-shot callbacks.
///
/// Callbacks run on the same thread as every other switch callback, never
/// concurrently with them.
pub trait Timer {
    /// Run `callback` once after `delay`.
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel an armed timer. Ids that already fired are ignored.
    fn cancel(&self, id: TimerId);
}
