//! Receivers of switch state changes.

use minirelay_domain::switch::StateChange;

/// Informed synchronously, once per genuine state transition.
///
/// An observer may write the switch again from inside the callback. The
/// nested change is delivered to every observer right away, and observers
/// not yet reached never see the outer change it replaced.
pub trait StateObserver {
    fn state_changed(&self, change: &StateChange);
}

impl<F: Fn(&StateChange)> StateObserver for F {
    fn state_changed(&self, change: &StateChange) {
        self(change);
    }
}
