//! Persistence: a string-keyed blob store and the typed adapter over the three documents.

mod data;
mod file;
mod memory;

pub use data::{DataStore, GAMES_KEY, PLAYERS_KEY, SETTINGS_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::models::StorageError;

/// Get/set by string key; values are JSON text.
pub trait KeyValueStore {
    /// Ok(None) when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
