//! Flag store persisted as one JSON document on disk.
//!
//! The document maps keys to integer arrays:
//! `{"new_badges": [5, 7]}`. Every `set` rewrites the whole file
//! atomically. A process-local lock serialises read-modify-write cycles.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde_json::Value;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::ports::{FlagStore, FlagStoreError};

/// File name of the flag document inside the store directory.
pub const FLAGS_FILE: &str = "flags.json";

/// [`FlagStore`] backed by `<dir>/flags.json`.
pub struct JsonFileFlagStore {
    dir: Dir,
    root: Utf8PathBuf,
    lock: Mutex<()>,
}

impl std::fmt::Debug for JsonFileFlagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileFlagStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl JsonFileFlagStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// [`FlagStoreError::Io`] when the directory cannot be created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, FlagStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(root, ambient_authority()))
            .map(|dir| Self {
                dir,
                root: root.to_path_buf(),
                lock: Mutex::new(()),
            })
            .map_err(|err| FlagStoreError::io(format!("opening `{root}`: {err}")))
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.root.join(FLAGS_FILE)
    }

    fn read_document(&self) -> Result<BTreeMap<String, Value>, FlagStoreError> {
        let raw = match self.dir.read_to_string(FLAGS_FILE) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(FlagStoreError::io(format!("reading `{}`: {err}", self.path())));
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|err| FlagStoreError::corrupt(FLAGS_FILE, err.to_string()))
    }
}

impl FlagStore for JsonFileFlagStore {
    fn get(&self, key: &str) -> Result<Option<Vec<i64>>, FlagStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(value) = self.read_document()?.remove(key) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| FlagStoreError::corrupt(key, err.to_string()))
    }

    fn set(&self, key: &str, values: &[i64]) -> Result<(), FlagStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        document.insert(key.to_owned(), Value::from(values.to_vec()));
        let contents = serde_json::to_string_pretty(&document)
            .map_err(|err| FlagStoreError::io(format!("encoding flags: {err}")))?;
        write_atomic(&self.dir, Utf8Path::new(FLAGS_FILE), &contents)?;
        debug!(key, len = values.len(), path = %self.path(), "flag stored");
        Ok(())
    }
}
