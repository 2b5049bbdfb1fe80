//! Input events delivered by digital input pins.

use serde::{Deserialize, Serialize};

/// Kind of event an input reports alongside its current level.
///
/// Only [`Change`](Self::Change) drives a switch; the gesture events are
/// produced by inputs that classify presses and are ignored by the switch
/// core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// The debounced level changed.
    Change,
    /// A single short press was recognised.
    Single,
    /// Two presses in quick succession.
    Double,
    /// The input was held for a long time.
    Long,
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Change => f.write_str("change"),
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
            Self::Long => f.write_str("long"),
        }
    }
}
