//! Local persistence.
//!
//! The focus companion keeps two independent records -- the task list and the
//! timer settings -- as serialized JSON under fixed keys of a string
//! key-value store. Both are read once at startup and rewritten wholesale on
//! every mutation. There is no schema versioning: a key holding invalid data
//! is treated as absent.

mod config;
pub mod database;
pub mod memory;

pub use config::{AudioConfig, Config, QuoteConfig, ShootingStarConfig, StarfieldConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;

/// Key of the persisted task list.
pub const TASKS_KEY: &str = "cosmos-tasks";
/// Key of the persisted timer settings.
pub const SETTINGS_KEY: &str = "cosmos-timer-settings";
/// Key the CLI uses to carry countdown state between invocations.
pub const TIMER_STATE_KEY: &str = "cosmos-timer-state";

/// A string key-value store with last-write-wins semantics.
///
/// Writes are synchronous; a successful `set` is visible to the next `get`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns `~/.config/cosmos-focus[-dev]/` based on COSMOS_FOCUS_ENV.
///
/// Set COSMOS_FOCUS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("COSMOS_FOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cosmos-focus-dev")
    } else {
        base_dir.join("cosmos-focus")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
