//! [`ConfigStore`] backed by a JSON file.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use minirelay_app::ports::ConfigStore;
use minirelay_domain::device::DeviceConfig;
use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::SwitchId;
use minirelay_domain::switch::SwitchConfig;

use crate::error::StorageError;

/// Configuration tree persisted as a single JSON document.
///
/// The tree is read once on [`open`](Self::open) and kept in memory; every
/// save writes the whole tree back.
pub struct JsonFileConfigStore {
    path: PathBuf,
    tree: RefCell<DeviceConfig>,
}

impl JsonFileConfigStore {
    /// Open the store at `path`, writing a default tree if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be read or created
    /// and [`StorageError::Json`] if it does not hold a valid tree.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let tree = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no configuration found, writing defaults");
                let tree = DeviceConfig::default();
                write_atomic(&path, &tree)?;
                tree
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self {
            path,
            tree: RefCell::new(tree),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn load(&self) -> Result<DeviceConfig, MiniRelayError> {
        Ok(self.tree.borrow().clone())
    }

    fn save_switch(&self, id: SwitchId, cfg: &SwitchConfig) -> Result<(), MiniRelayError> {
        let mut next = self.tree.borrow().clone();
        let slot = next.switch_mut(id).ok_or(StorageError::UnknownSwitch(id))?;
        *slot = cfg.clone();
        write_atomic(&self.path, &next)?;
        *self.tree.borrow_mut() = next;
        tracing::debug!(switch_id = %id, path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, tree: &DeviceConfig) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(tree)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&tmp, bytes).map_err(|source| StorageError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
