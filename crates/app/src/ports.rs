//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the switch core and the outside world.
//! They are defined here (in `app`) so that both the core and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod hardware;
pub mod notify;
pub mod storage;
pub mod timer;

pub use hardware::{Input, InputHandler, Output, PowerMeter};
pub use notify::StateObserver;
pub use storage::ConfigStore;
pub use timer::{Timer, TimerCallback};
