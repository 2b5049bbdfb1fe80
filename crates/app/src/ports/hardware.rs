//! Pin driver ports — digital inputs, digital outputs and power meters.

use minirelay_domain::error::MeterError;
use minirelay_domain::id::{HandlerId, InputId, OutputId};
use minirelay_domain::input::InputEvent;

/// Callback invoked with every event an input produces and the level at
/// that moment.
pub type InputHandler = Box<dyn FnMut(InputEvent, bool)>;

/// A debounced digital input.
///
/// Handlers may be added and removed at any time, including from inside a
/// handler invocation.
pub trait Input {
    fn id(&self) -> InputId;

    /// Register a handler; keep the returned id to remove it later.
    fn add_handler(&self, handler: InputHandler) -> HandlerId;

    /// Remove a handler. Unknown ids are ignored.
    fn remove_handler(&self, id: HandlerId);

    /// Current debounced level.
    fn state(&self) -> bool;
}

/// A digital output. Only its owning switch writes to it.
pub trait Output {
    fn id(&self) -> OutputId;

    /// Drive the output. `source` is a provenance tag for diagnostics.
    fn set_state(&self, on: bool, source: &str);

    fn state(&self) -> bool;
}

/// Power measurement attached to an output.
pub trait PowerMeter {
    /// Instantaneous active power in watts.
    ///
    /// # Errors
    ///
    /// Returns a [`MeterError`] when no reading is available.
    fn power_w(&self) -> Result<f64, MeterError>;

    /// Accumulated energy in watt-hours.
    ///
    /// # Errors
    ///
    /// Returns a [`MeterError`] when no reading is available.
    fn energy_wh(&self) -> Result<f64, MeterError>;
}
