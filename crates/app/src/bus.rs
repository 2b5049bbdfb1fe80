//! In-process state-change bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use minirelay_domain::switch::StateChange;

use crate::ports::StateObserver;

/// Fans switch state changes out to async subscribers.
///
/// Register it on every switch with
/// [`Switch::subscribe`](crate::switch::Switch::subscribe). Publishing
/// succeeds even when there are no active subscribers (the change is simply
/// dropped).
pub struct StateChangeBus {
    sender: broadcast::Sender<StateChange>,
}

impl StateChangeBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to changes on this bus.
    ///
    /// Returns a receiver that will get all changes published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }
}

impl StateObserver for StateChangeBus {
    fn state_changed(&self, change: &StateChange) {
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(change.clone());
    }
}
