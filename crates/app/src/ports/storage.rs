//! Storage port for the durable configuration tree.

use minirelay_domain::device::DeviceConfig;
use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::SwitchId;
use minirelay_domain::switch::SwitchConfig;

/// Read-on-construct, write-through configuration store.
pub trait ConfigStore {
    /// Load the full configuration tree.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRelayError::Storage`] if the backend cannot be read.
    fn load(&self) -> Result<DeviceConfig, MiniRelayError>;

    /// Replace one switch's section and durably commit the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRelayError::Storage`] if the write fails.
    fn save_switch(&self, id: SwitchId, cfg: &SwitchConfig) -> Result<(), MiniRelayError>;
}
