//! Browser LocalStorage backend

use super::{PersistError, Storage};

/// Stores each key directly in `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".to_string()))?
            .local_storage()
            .ok()
            .flatten()
            .ok_or_else(|| PersistError::Unavailable("LocalStorage disabled".to_string()))
    }
}

impl Storage for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| PersistError::Unavailable(format!("cannot read {key}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| PersistError::Unavailable(format!("cannot write {key}")))
    }
}
