//! Greeting consumer
//!
//! Headless version of the "type your name" form: the name lives in a
//! [`PersistentState`] so it survives restarts.

use crate::error::BindingResult;
use crate::persistence::{JsonCodec, PersistentState, Setter, SyncOutcome};
use crate::store::Store;

pub struct Greeting<S: Store> {
    name: PersistentState<String, S, JsonCodec<String>>,
    set_name: Setter<String>,
}

impl<S: Store> Greeting<S> {
    /// Bind the greeting to `key`; `initial_name` is used when nothing is stored.
    pub fn new(store: S, key: &str, initial_name: &str) -> BindingResult<Self> {
        let name = PersistentState::with_json(store, key, initial_name.to_string())?;
        let set_name = name.setter();
        Ok(Self { name, set_name })
    }

    pub fn name(&self) -> String {
        self.name.get()
    }

    pub fn key(&self) -> &str {
        self.name.key()
    }

    /// Input change event
    pub fn handle_change(&self, value: &str) {
        self.set_name.set(value.to_string());
    }

    /// Move the stored name to another slot
    pub fn rebind(&mut self, key: &str) -> BindingResult<()> {
        self.name.set_key(key)
    }

    /// End of an update cycle: persist whatever changed
    pub fn commit(&mut self) -> BindingResult<SyncOutcome> {
        self.name.synchronize()
    }

    pub fn render(&self) -> String {
        self.name.with(|name| {
            if name.is_empty() {
                "type your name".to_string()
            } else {
                format!("Hello, {}", name)
            }
        })
    }
}
