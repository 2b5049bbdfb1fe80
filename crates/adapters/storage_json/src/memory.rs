//! Volatile [`ConfigStore`].

use std::cell::RefCell;

use minirelay_app::ports::ConfigStore;
use minirelay_domain::device::DeviceConfig;
use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::SwitchId;
use minirelay_domain::switch::SwitchConfig;

use crate::error::StorageError;

/// Keeps the tree in memory only.
#[derive(Default)]
pub struct InMemoryConfigStore {
    tree: RefCell<DeviceConfig>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new(tree: DeviceConfig) -> Self {
        Self {
            tree: RefCell::new(tree),
        }
    }

    /// Copy of the stored tree.
    #[must_use]
    pub fn snapshot(&self) -> DeviceConfig {
        self.tree.borrow().clone()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load(&self) -> Result<DeviceConfig, MiniRelayError> {
        Ok(self.snapshot())
    }

    fn save_switch(&self, id: SwitchId, cfg: &SwitchConfig) -> Result<(), MiniRelayError> {
        let mut tree = self.tree.borrow_mut();
        let slot = tree.switch_mut(id).ok_or(StorageError::UnknownSwitch(id))?;
        *slot = cfg.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_saved_switch() {
        let store = InMemoryConfigStore::default();
        let cfg = SwitchConfig::builder().name("Fan").build().unwrap();
        store.save_switch(SwitchId::new(1), &cfg).unwrap();
        assert_eq!(store.load().unwrap().sw1.name, "Fan");
        assert_eq!(store.snapshot().sw2.name, "Switch 2");
    }

    #[test]
    fn should_reject_unknown_switch() {
        let store = InMemoryConfigStore::default();
        assert!(
            store
                .save_switch(SwitchId::new(0), &SwitchConfig::default())
                .is_err()
        );
    }
}
