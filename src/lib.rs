//! Stored State - in-memory state bound to a persistent key-value store
//!
//! Core modules:
//! - `persistence`: the binding (activation, synchronization, codecs)
//! - `store`: store trait, in-memory and namespaced stores
//! - `platform`: LocalStorage on web, file storage on native
//! - `settings`: backend and key configuration
//! - `greeting`: example consumer

pub mod error;
pub mod greeting;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod store;

pub use error::{BindingError, CodecError, StoreError};
pub use greeting::Greeting;
pub use persistence::{
    Codec, DefaultValue, FnCodec, JsonCodec, PersistentState, Setter, SyncOutcome, TextCodec,
};
pub use settings::{Settings, StorageBackend};
pub use store::{MemoryStore, Namespaced, Store};
