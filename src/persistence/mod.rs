//! State persistence
//!
//! Features:
//! - Lazy read-or-initialize on activation
//! - Pluggable codecs (JSON by default)
//! - Corrupt entry detection and recovery
//! - Key migration (old slot removed when the key changes)

pub mod binding;
pub mod codec;

pub use binding::{DefaultValue, PersistentState, Setter, SyncOutcome};
pub use codec::{Codec, FnCodec, JsonCodec, TextCodec};
