//! Platform abstraction layer
//!
//! Handles browser/native differences for logging setup and the native
//! storage backend.

#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::Storage;

/// Install the logger for this platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the console logger and panic hook. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Native storage backend: a directory of JSON files (`PIXEL_INVADERS_DATA`,
/// defaulting to `.pixel-invaders`). The browser build uses
/// `LocalStorageStore` directly.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> impl Storage {
    let dir = std::env::var_os("PIXEL_INVADERS_DATA")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from(".pixel-invaders"));
    crate::persistence::JsonFileStore::new(dir)
}
