//! Badges earned but not yet looked at.
//!
//! Identifiers live in the injected [`FlagStore`] under one key as an
//! ordered sequence. `add` appends without checking for duplicates, so a
//! badge awarded twice before being viewed counts twice; stored data from
//! earlier clients keeps the same meaning.

use std::sync::Arc;

use tracing::debug;

use super::EntityId;
use super::ports::{FlagStore, FlagStoreError};

/// Flag store key holding the unseen badge identifiers.
pub const UNSEEN_AWARDS_KEY: &str = "new_badges";

/// Counter of unseen award identifiers backed by a [`FlagStore`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use compass::domain::UnseenAwards;
/// use compass::domain::ports::FixtureFlagStore;
///
/// let awards = UnseenAwards::new(Arc::new(FixtureFlagStore::default()));
/// awards.add(5.into())?;
/// awards.add(7.into())?;
/// assert_eq!(awards.count()?, 2);
/// assert!(awards.remove(5.into())?);
/// assert_eq!(awards.list()?, vec![7.into()]);
/// # Ok::<(), compass::domain::ports::FlagStoreError>(())
/// ```
pub struct UnseenAwards<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for UnseenAwards<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> UnseenAwards<S>
where
    S: FlagStore + ?Sized,
{
    /// Wrap a flag store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<i64>, FlagStoreError> {
        Ok(self.store.get(UNSEEN_AWARDS_KEY)?.unwrap_or_default())
    }

    /// Append `id`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn add(&self, id: EntityId) -> Result<(), FlagStoreError> {
        let mut ids = self.load()?;
        ids.push(id.get());
        self.store.set(UNSEEN_AWARDS_KEY, &ids)?;
        debug!(badge_id = %id, count = ids.len(), "award marked unseen");
        Ok(())
    }

    /// Number of stored identifiers; 0 when nothing was stored.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn count(&self) -> Result<usize, FlagStoreError> {
        self.load().map(|ids| ids.len())
    }

    /// Stored identifiers in insertion order.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn list(&self) -> Result<Vec<EntityId>, FlagStoreError> {
        self.load()
            .map(|ids| ids.into_iter().map(EntityId::new).collect())
    }

    /// Remove the first occurrence of `id`. Returns whether it was present;
    /// an absent id leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn remove(&self, id: EntityId) -> Result<bool, FlagStoreError> {
        let mut ids = self.load()?;
        let Some(position) = ids.iter().position(|stored| *stored == id.get()) else {
            return Ok(false);
        };
        ids.remove(position);
        self.store.set(UNSEEN_AWARDS_KEY, &ids)?;
        debug!(badge_id = %id, count = ids.len(), "award acknowledged");
        Ok(true)
    }

    /// Mark a badge as viewed and return the label for the awards tab.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn acknowledge(&self, id: EntityId) -> Result<Option<String>, FlagStoreError> {
        self.remove(id)?;
        self.tab_label()
    }

    /// Badge label for the awards tab: `None` when nothing is unseen.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn tab_label(&self) -> Result<Option<String>, FlagStoreError> {
        self.count()
            .map(|count| (count > 0).then(|| count.to_string()))
    }
}
