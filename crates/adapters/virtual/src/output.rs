//! Virtual relay output.

use std::cell::Cell;

use minirelay_app::ports::Output;
use minirelay_domain::id::OutputId;

/// A simulated relay driven by one pin.
pub struct VirtualOutput {
    id: OutputId,
    pin: u8,
    inverted: bool,
    level: Cell<bool>,
}

impl VirtualOutput {
    /// Create an output that starts off.
    #[must_use]
    pub fn new(id: OutputId, pin: u8, inverted: bool) -> Self {
        Self {
            id,
            pin,
            inverted,
            level: Cell::new(false),
        }
    }

    #[must_use]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Level currently applied to the pin.
    #[must_use]
    pub fn raw_level(&self) -> bool {
        self.level.get() != self.inverted
    }
}

impl Output for VirtualOutput {
    fn id(&self) -> OutputId {
        self.id
    }

    fn set_state(&self, on: bool, source: &str) {
        self.level.set(on);
        tracing::debug!(
            output_id = %self.id,
            pin = self.pin,
            on,
            raw = self.raw_level(),
            source,
            "output set"
        );
    }

    fn state(&self) -> bool {
        self.level.get()
    }
}
