//! Persistent state binding
//!
//! Pairs an in-memory value with one slot of a [`Store`]:
//! - Activation reads the slot once (lazy default, corrupt-entry recovery)
//! - `synchronize` writes back only when key, value or codec changed
//! - Switching keys removes the abandoned slot in the same synchronization

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BindingError, BindingResult};
use crate::persistence::codec::{Codec, JsonCodec};
use crate::store::Store;

/// Initial value used when the store has no entry for the key.
pub enum DefaultValue<T> {
    Value(T),
    /// Producer for values that are expensive to build. Runs at most once.
    Lazy(Box<dyn FnOnce() -> T>),
}

impl<T> DefaultValue<T> {
    pub fn lazy(producer: impl FnOnce() -> T + 'static) -> Self {
        DefaultValue::Lazy(Box::new(producer))
    }

    fn resolve(self) -> T {
        match self {
            DefaultValue::Value(value) => value,
            DefaultValue::Lazy(producer) => producer(),
        }
    }
}

impl<T> From<T> for DefaultValue<T> {
    fn from(value: T) -> Self {
        DefaultValue::Value(value)
    }
}

/// Result of a synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing changed since the last write
    Unchanged,
    /// The value was written; `migrated_from` names the removed old key
    Written { migrated_from: Option<String> },
}

struct Slot<T> {
    value: T,
    /// Bumped on every committed change
    revision: u64,
}

/// Cloneable handle that replaces the bound value.
///
/// Event handlers keep a `Setter` without borrowing the binding itself. The
/// store is only touched on the next [`PersistentState::synchronize`].
pub struct Setter<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: PartialEq> Setter<T> {
    /// Replace the value. Setting an equal value is not a change.
    pub fn set(&self, value: T) {
        let mut slot = self.slot.borrow_mut();
        if slot.value != value {
            slot.value = value;
            slot.revision += 1;
        }
    }

    /// Mutate the value in place; always counts as a change.
    ///
    /// `f` must not read or set the same binding, it already holds the value
    /// mutably.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut slot = self.slot.borrow_mut();
        f(&mut slot.value);
        slot.revision += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Synced {
    key: String,
    revision: u64,
    codec_revision: u64,
}

/// In-memory value bound to a store slot.
pub struct PersistentState<T, S, C = JsonCodec<T>> {
    slot: Rc<RefCell<Slot<T>>>,
    store: S,
    codec: C,
    codec_revision: u64,
    key: String,
    /// Key of the last write; compared only, never kept alive
    previous_key: String,
    synced: Option<Synced>,
}

impl<T, S> PersistentState<T, S, JsonCodec<T>>
where
    T: PartialEq + Serialize + DeserializeOwned,
    S: Store,
{
    /// Activate with the default JSON codec.
    pub fn with_json(
        store: S,
        key: impl Into<String>,
        default: impl Into<DefaultValue<T>>,
    ) -> BindingResult<Self> {
        Self::activate(store, key, default, JsonCodec::new())
    }
}

impl<T, S, C> PersistentState<T, S, C>
where
    T: PartialEq,
    S: Store,
    C: Codec<T>,
{
    /// Read-or-initialize the value for `key`.
    ///
    /// A stored entry that fails to deserialize is removed and the default is
    /// used instead. Nothing is written until the first [`synchronize`].
    ///
    /// [`synchronize`]: Self::synchronize
    pub fn activate(
        store: S,
        key: impl Into<String>,
        default: impl Into<DefaultValue<T>>,
        codec: C,
    ) -> BindingResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(BindingError::EmptyKey);
        }

        let value = match restore(&store, &key, &codec) {
            Some(value) => value,
            None => {
                log::debug!("No stored value for '{}', using default", key);
                default.into().resolve()
            }
        };

        Ok(Self {
            slot: Rc::new(RefCell::new(Slot { value, revision: 0 })),
            store,
            codec,
            codec_revision: 0,
            previous_key: key.clone(),
            key,
            synced: None,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.slot.borrow().value.clone()
    }

    /// Borrow the current value.
    ///
    /// `f` must not set or update this binding; the value is borrowed while
    /// it runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow().value)
    }

    pub fn setter(&self) -> Setter<T> {
        Setter {
            slot: self.slot.clone(),
        }
    }

    /// Current value plus its setter
    pub fn pair(&self) -> (T, Setter<T>)
    where
        T: Clone,
    {
        (self.get(), self.setter())
    }

    pub fn set(&self, value: T) {
        self.setter().set(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.setter().update(f);
    }

    /// Bind to a different slot. The old slot is removed on the next
    /// synchronization.
    pub fn set_key(&mut self, key: impl Into<String>) -> BindingResult<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(BindingError::EmptyKey);
        }
        self.key = key;
        Ok(())
    }

    /// Swap the codec. The value is re-serialized on the next synchronization.
    pub fn set_codec(&mut self, codec: C) {
        self.codec = codec;
        self.codec_revision += 1;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the next synchronization would write
    pub fn is_dirty(&self) -> bool {
        self.synced.as_ref() != Some(&self.snapshot())
    }

    fn snapshot(&self) -> Synced {
        Synced {
            key: self.key.clone(),
            revision: self.slot.borrow().revision,
            codec_revision: self.codec_revision,
        }
    }

    /// Reconcile the store with the in-memory value.
    ///
    /// Call once per committed update cycle. Writes only when the key, the
    /// value or the codec changed since the last successful write. On error
    /// the in-memory value is untouched and the next call retries.
    pub fn synchronize(&mut self) -> BindingResult<SyncOutcome> {
        let current = self.snapshot();
        if self.synced.as_ref() == Some(&current) {
            return Ok(SyncOutcome::Unchanged);
        }

        // Serialize before touching the store so a failure leaves it intact
        let text = self
            .codec
            .serialize(&self.slot.borrow().value)
            .map_err(|source| BindingError::Serialize {
                key: self.key.clone(),
                source,
            })?;

        let mut migrated_from = None;
        if self.previous_key != self.key {
            self.store
                .remove(&self.previous_key)
                .map_err(|source| BindingError::Store {
                    key: self.previous_key.clone(),
                    source,
                })?;
            log::info!("Moved stored value '{}' -> '{}'", self.previous_key, self.key);
            migrated_from = Some(std::mem::replace(&mut self.previous_key, self.key.clone()));
        }

        self.store
            .set(&self.key, &text)
            .map_err(|source| BindingError::Store {
                key: self.key.clone(),
                source,
            })?;

        self.synced = Some(current);
        Ok(SyncOutcome::Written { migrated_from })
    }
}

/// Read and decode the entry at `key`, purging it if it is corrupt.
fn restore<T, S: Store, C: Codec<T>>(store: &S, key: &str, codec: &C) -> Option<T> {
    let entry = match store.get(key) {
        Ok(Some(entry)) if !entry.is_empty() => entry,
        Ok(_) => return None,
        Err(e) => {
            log::warn!("Cannot read '{}', continuing with default: {}", key, e);
            return None;
        }
    };

    match codec.deserialize(&entry) {
        Ok(value) => {
            log::debug!("Restored '{}' from store", key);
            Some(value)
        }
        Err(e) => {
            log::warn!("Discarding corrupt entry at '{}': {}", key, e);
            if let Err(e) = store.remove(key) {
                log::warn!("Cannot remove corrupt entry at '{}': {}", key, e);
            }
            None
        }
    }
}
