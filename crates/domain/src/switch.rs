//! Switch — one output level bound to an optional input and power meter.
//!
//! This module holds the pure parts of a switch: its persisted
//! configuration, the decoding of integer-encoded settings, the rules for
//! remote configuration updates, the side effects of a state write, and the
//! introspection snapshot. The stateful component that drives ports lives in
//! the `app` crate.

mod config;
mod event;
mod info;
mod mode;
mod patch;
mod transition;

pub use config::{SwitchConfig, SwitchConfigBuilder};
pub use event::StateChange;
pub use info::{ComponentType, SwitchInfo};
pub use mode::{InMode, InitialState, InputAction, SvcType};
pub use patch::{ConfigPatch, ConfigUpdate};
pub use transition::{Cause, TimerAction, Transition};
