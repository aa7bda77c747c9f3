//! Platform abstraction layer
//!
//! Handles browser/native differences for storage:
//! - LocalStorage on web
//! - A JSON file on native

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
