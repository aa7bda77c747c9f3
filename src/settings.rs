//! Runtime settings
//!
//! Which store backs the bindings and which slot the greeting binds to.
//! Read from `STORED_STATE_*` environment variables on native.

use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};
use crate::store::{MemoryStore, Namespaced, Store};

/// Storage backend choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// JSON file (native only)
    File,
    /// Browser LocalStorage (web only)
    Local,
}

impl Default for StorageBackend {
    #[cfg(target_arch = "wasm32")]
    fn default() -> Self {
        StorageBackend::Local
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn default() -> Self {
        StorageBackend::File
    }
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::Local => "local",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(StorageBackend::Memory),
            "file" => Some(StorageBackend::File),
            "local" | "localstorage" => Some(StorageBackend::Local),
            _ => None,
        }
    }
}

/// Settings for opening a store and binding the greeting
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: StorageBackend,
    /// Prefix applied to every key, e.g. `greeting_`
    pub namespace: String,
    /// File used by the file backend
    pub file_path: PathBuf,
    /// Slot the greeting binds to
    pub key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            namespace: "greeting_".to_string(),
            file_path: PathBuf::from("stored_state.json"),
            key: "name".to_string(),
        }
    }
}

impl Settings {
    const ENV_BACKEND: &'static str = "STORED_STATE_BACKEND";
    const ENV_NAMESPACE: &'static str = "STORED_STATE_NAMESPACE";
    const ENV_FILE: &'static str = "STORED_STATE_FILE";
    const ENV_KEY: &'static str = "STORED_STATE_KEY";

    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup; unset or invalid values keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup(Self::ENV_BACKEND) {
            match StorageBackend::from_str(&raw) {
                Some(backend) => settings.backend = backend,
                None => log::warn!(
                    "Unknown {} '{}', using {}",
                    Self::ENV_BACKEND,
                    raw,
                    settings.backend.as_str()
                ),
            }
        }
        if let Some(namespace) = lookup(Self::ENV_NAMESPACE) {
            settings.namespace = namespace;
        }
        if let Some(path) = lookup(Self::ENV_FILE).filter(|p| !p.is_empty()) {
            settings.file_path = PathBuf::from(path);
        }
        if let Some(key) = lookup(Self::ENV_KEY).filter(|k| !k.is_empty()) {
            settings.key = key;
        }

        settings
    }

    /// Open the configured backend wrapped in the key namespace
    pub fn open_store(&self) -> StoreResult<Namespaced<Box<dyn Store>>> {
        let store: Box<dyn Store> = match self.backend {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::File => open_file(self)?,
            StorageBackend::Local => open_local()?,
        };
        log::info!(
            "Using {} storage (namespace '{}')",
            self.backend.as_str(),
            self.namespace
        );
        Ok(Namespaced::new(self.namespace.clone(), store))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_file(settings: &Settings) -> StoreResult<Box<dyn Store>> {
    Ok(Box::new(crate::platform::FileStore::open(
        settings.file_path.clone(),
    )?))
}

#[cfg(target_arch = "wasm32")]
fn open_file(_settings: &Settings) -> StoreResult<Box<dyn Store>> {
    Err(StoreError::Unavailable("file storage is native only".into()))
}

#[cfg(target_arch = "wasm32")]
fn open_local() -> StoreResult<Box<dyn Store>> {
    Ok(Box::new(crate::platform::LocalStorage::open()?))
}

#[cfg(not(target_arch = "wasm32"))]
fn open_local() -> StoreResult<Box<dyn Store>> {
    Err(StoreError::Unavailable("localStorage is web only".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(StorageBackend::from_str("Memory"), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::from_str(" FILE "), Some(StorageBackend::File));
        assert_eq!(StorageBackend::from_str("localStorage"), Some(StorageBackend::Local));
        assert_eq!(StorageBackend::from_str("redis"), None);
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("STORED_STATE_BACKEND", "memory"),
            ("STORED_STATE_NAMESPACE", "app_"),
            ("STORED_STATE_KEY", "animal"),
        ]
        .into_iter()
        .collect();

        let settings = Settings::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(settings.backend, StorageBackend::Memory);
        assert_eq!(settings.namespace, "app_");
        assert_eq!(settings.key, "animal");
        assert_eq!(settings.file_path, PathBuf::from("stored_state.json"));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let settings = Settings::from_lookup(|name| match name {
            "STORED_STATE_BACKEND" => Some("redis".into()),
            "STORED_STATE_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.backend, StorageBackend::default());
        assert_eq!(settings.key, "name");
    }

    #[test]
    fn test_open_memory_store_is_namespaced() {
        let settings = Settings {
            backend: StorageBackend::Memory,
            ..Settings::default()
        };
        let store = settings.open_store().unwrap();
        store.set("name", "1").unwrap();
        assert_eq!(store.inner().get("greeting_name").unwrap().as_deref(), Some("1"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_local_backend_unavailable_on_native() {
        let settings = Settings {
            backend: StorageBackend::Local,
            ..Settings::default()
        };
        assert!(matches!(
            settings.open_store(),
            Err(StoreError::Unavailable(_))
        ));
    }
}
