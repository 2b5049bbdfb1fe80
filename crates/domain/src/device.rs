//! The device configuration tree, everything the relay board persists.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::SwitchId;
use crate::switch::SwitchConfig;

/// Persisted configuration of a two-channel relay board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Installation was upgraded from a release that grouped both switches
    /// into the primary accessory.
    pub legacy_hap_layout: bool,
    pub sw1: SwitchConfig,
    pub sw2: SwitchConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            legacy_hap_layout: false,
            sw1: SwitchConfig {
                name: "Switch 1".to_string(),
                ..SwitchConfig::default()
            },
            sw2: SwitchConfig {
                name: "Switch 2".to_string(),
                ..SwitchConfig::default()
            },
        }
    }
}

impl DeviceConfig {
    /// Ids of the switch slots on this board, in slot order.
    pub const SLOTS: [SwitchId; 2] = [SwitchId::new(1), SwitchId::new(2)];

    /// Configuration of the given slot.
    #[must_use]
    pub fn switch(&self, id: SwitchId) -> Option<&SwitchConfig> {
        match id.get() {
            1 => Some(&self.sw1),
            2 => Some(&self.sw2),
            _ => None,
        }
    }

    /// Check every slot's record.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in slot order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.sw1.validate()?;
        self.sw2.validate()
    }

    /// Mutable configuration of the given slot.
    pub fn switch_mut(&mut self, id: SwitchId) -> Option<&mut SwitchConfig> {
        match id.get() {
            1 => Some(&mut self.sw1),
            2 => Some(&mut self.sw2),
            _ => None,
        }
    }
}
