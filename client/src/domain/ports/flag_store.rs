//! Port for the small on-device key-value store holding client flags.
//!
//! Values are ordered sequences of integers (for example the identifiers of
//! badges the user has not looked at yet). Access is synchronous: the store
//! is only touched from the foreground context.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by flag store adapters.
    pub enum FlagStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } =>
            "flag store i/o failed: {message}",
        /// Stored data could not be interpreted.
        Corrupt { key: String, message: String } =>
            "flag store entry `{key}` is corrupt: {message}",
    }
}

/// Key-value storage for integer sequences.
///
/// `get` returns `None` when nothing was ever stored under `key`; `set`
/// replaces the whole sequence.
#[cfg_attr(test, mockall::automock)]
pub trait FlagStore: Send + Sync {
    /// Read the sequence stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<i64>>, FlagStoreError>;

    /// Replace the sequence stored under `key`.
    fn set(&self, key: &str, values: &[i64]) -> Result<(), FlagStoreError>;
}

/// Fixture store holding every key in memory.
///
/// # Examples
/// ```
/// use compass::domain::ports::{FlagStore, FixtureFlagStore};
///
/// let store = FixtureFlagStore::default();
/// assert_eq!(store.get("new_badges").unwrap(), None);
/// store.set("new_badges", &[5, 7]).unwrap();
/// assert_eq!(store.get("new_badges").unwrap(), Some(vec![5, 7]));
/// ```
#[derive(Debug, Default)]
pub struct FixtureFlagStore {
    entries: Mutex<BTreeMap<String, Vec<i64>>>,
}

impl FlagStore for FixtureFlagStore {
    fn get(&self, key: &str) -> Result<Option<Vec<i64>>, FlagStoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, values: &[i64]) -> Result<(), FlagStoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), values.to_vec());
        Ok(())
    }
}
