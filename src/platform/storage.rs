//! Platform storage backends

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::error::{StoreError, StoreResult};
    use crate::store::Store;

    /// Browser `window.localStorage`
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        /// Fails when there is no window or storage is disabled.
        pub fn open() -> StoreResult<Self> {
            let storage = web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
                .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
            Ok(Self { storage })
        }
    }

    impl Store for LocalStorage {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.storage
                .get_item(key)
                .map_err(|e| StoreError::Backend(format!("{:?}", e)))
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.storage
                .set_item(key, value)
                .map_err(|e| StoreError::Backend(format!("{:?}", e)))
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            self.storage
                .remove_item(key)
                .map_err(|e| StoreError::Backend(format!("{:?}", e)))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::error::StoreResult;
    use crate::store::Store;

    /// All entries kept in one JSON object file.
    ///
    /// Every mutation rewrites the file (tmp file, then rename), so a crash
    /// never leaves a half-written store behind.
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: RefCell<BTreeMap<String, String>>,
    }

    impl FileStore {
        /// Open the store at `path`. A missing file is an empty store.
        pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
            let path = path.into();
            let entries = match fs::read_to_string(&path) {
                Ok(json) => serde_json::from_str(&json)?,
                Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            log::debug!("Opened {} with {} entries", path.display(), entries.len());
            Ok(Self {
                path,
                entries: RefCell::new(entries),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
            let json = serde_json::to_string_pretty(entries)?;
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl Store for FileStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            let mut next = self.entries.borrow().clone();
            next.insert(key.to_string(), value.to_string());
            self.flush(&next)?;
            *self.entries.borrow_mut() = next;
            Ok(())
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            if !self.entries.borrow().contains_key(key) {
                return Ok(());
            }
            let mut next = self.entries.borrow().clone();
            next.remove(key);
            self.flush(&next)?;
            *self.entries.borrow_mut() = next;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::error::StoreError;

        #[test]
        fn test_file_store_persists_across_opens() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");

            let store = FileStore::open(&path).unwrap();
            store.set("name", "\"Ada\"").unwrap();
            store.set("animal", "\"otter\"").unwrap();
            store.remove("animal").unwrap();
            drop(store);

            let reopened = FileStore::open(&path).unwrap();
            assert_eq!(reopened.get("name").unwrap().as_deref(), Some("\"Ada\""));
            assert_eq!(reopened.get("animal").unwrap(), None);
        }

        #[test]
        fn test_file_store_missing_file_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::open(dir.path().join("nested/state.json")).unwrap();
            assert_eq!(store.get("name").unwrap(), None);

            // Parent directories are created on first write
            store.set("name", "1").unwrap();
            assert!(store.path().exists());
        }

        #[test]
        fn test_file_store_rejects_garbage_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            fs::write(&path, "not json").unwrap();

            let err = FileStore::open(&path).unwrap_err();
            assert!(matches!(err, StoreError::Encoding(_)));
        }
    }
}
