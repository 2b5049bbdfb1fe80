//! # minirelay-adapter-virtual
//!
//! Simulated board peripherals, so the switch core can run on a host.
//!
//! ## Provided peripherals
//!
//! | Peripheral | Port | Behaviour |
//! |------------|------|-----------|
//! | [`VirtualInput`] | `Input` | Level driven by [`VirtualInput::set_raw_level`], reports `Change` on every logical level change |
//! | [`VirtualOutput`] | `Output` | Holds the logical level, exposes the resulting pin level |
//! | [`VirtualPowerMeter`] | `PowerMeter` | Returns readings set by the caller, can be made to fail |
//!
//! ## Dependency rule
//!
//! Depends on `minirelay-app` (port traits) and `minirelay-domain` only.

mod input;
mod meter;
mod output;

pub use input::VirtualInput;
pub use meter::{PowerMeterError, VirtualPowerMeter};
pub use output::VirtualOutput;
