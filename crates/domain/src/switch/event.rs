//! State-change notification payload.

use serde::Serialize;

use crate::id::SwitchId;

/// A switch's observable level changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub switch_id: SwitchId,
    pub state: bool,
    /// Provenance tag of the write (`"button"`, `"auto_off"`, …).
    pub source: String,
}
