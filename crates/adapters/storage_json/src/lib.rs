//! # minirelay-adapter-storage-json
//!
//! Persistence of the device configuration tree.
//!
//! ## Responsibilities
//! - Implement the `ConfigStore` port defined in `minirelay-app::ports`
//! - Keep the JSON file consistent: every save rewrites the whole tree to a
//!   temporary file and renames it over the previous one
//! - Create a default tree when no file exists yet
//!
//! ## Dependency rule
//! Depends on `minirelay-app` (for port traits) and `minirelay-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::JsonFileConfigStore;
pub use memory::InMemoryConfigStore;
