//! Synchronous string-keyed storage
//!
//! A [`Store`] is the process-wide key-value namespace a binding persists
//! into. Backends:
//! - [`MemoryStore`]: shared in-process map (tests, native fallback)
//! - [`Namespaced`]: prefixes every key of an inner store
//! - `platform::storage`: LocalStorage on web, a JSON file on native

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::StoreResult;

/// Synchronous key-value store.
///
/// Methods take `&self`; backends use interior mutability so several
/// bindings can share one store handle.
pub trait Store {
    /// Read the entry at `key`, `None` if absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` at `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the entry at `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for Rc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Sorted list of keys
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store adapter that prefixes every key, e.g. `greeting_` + `name`.
#[derive(Debug, Clone)]
pub struct Namespaced<S> {
    prefix: String,
    inner: S,
}

impl<S: Store> Namespaced<S> {
    pub fn new(prefix: impl Into<String>, inner: S) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S: Store> Store for Namespaced<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(&self.full_key(key), value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(&self.full_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();

        a.set("name", "\"Ada\"").unwrap();
        assert_eq!(b.get("name").unwrap().as_deref(), Some("\"Ada\""));

        b.remove("name").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_memory_store_remove_absent_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_namespaced_prefixes_keys() {
        let backing = MemoryStore::new();
        let store = Namespaced::new("greeting_", backing.clone());

        store.set("name", "\"Ada\"").unwrap();
        assert_eq!(backing.keys(), vec!["greeting_name".to_string()]);
        assert_eq!(store.get("name").unwrap().as_deref(), Some("\"Ada\""));
        assert_eq!(backing.get("name").unwrap(), None);

        store.remove("name").unwrap();
        assert!(backing.is_empty());
    }

    #[test]
    fn test_store_through_rc_and_ref() {
        let store = Rc::new(MemoryStore::new());
        let by_ref: &MemoryStore = &store;

        Store::set(&store, "k", "v").unwrap();
        assert_eq!(Store::get(&by_ref, "k").unwrap().as_deref(), Some("v"));
    }
}
