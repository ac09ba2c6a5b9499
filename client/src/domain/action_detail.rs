//! Action detail: a user action followed by its primary category.
//!
//! The category is a secondary load. It only runs once the action decoded,
//! and its failure never hides the action.

use std::sync::Arc;

use tracing::debug;

use super::ports::{ApiGateway, FetchError};
use super::{ApiRoute, AuthHeaders, Category, EntityFetcher, EntityId, FetchOutcome, UserAction};

/// What the category region of an action shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryState {
    /// The action has no primary category; nothing was fetched.
    Unassigned,
    /// The category loaded.
    Loaded(Category),
    /// The category fetch failed.
    Failed(FetchError),
}

/// A loaded action and the state of its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDetail {
    /// The action itself.
    pub action: UserAction,
    /// Its primary category.
    pub category: CategoryState,
}

/// Loads action details.
pub struct ActionDetailService<G: ?Sized> {
    fetcher: EntityFetcher<G>,
    headers: AuthHeaders,
}

impl<G> ActionDetailService<G>
where
    G: ApiGateway + ?Sized,
{
    /// Build a service over `gateway`.
    pub fn new(gateway: Arc<G>, headers: AuthHeaders) -> Self {
        Self {
            fetcher: EntityFetcher::new(gateway),
            headers,
        }
    }

    /// Fetch action `id`, then its primary category when it has one.
    ///
    /// # Errors
    ///
    /// The action's fetch failure. Category failures are reported through
    /// [`CategoryState::Failed`] instead.
    pub async fn load(&self, id: EntityId) -> FetchOutcome<ActionDetail> {
        let action = self
            .fetcher
            .fetch::<UserAction>(ApiRoute::UserAction(id), &self.headers)
            .await?;
        let category = match action.primary_category {
            None => CategoryState::Unassigned,
            Some(category_id) => {
                debug!(action_id = %id, %category_id, "loading primary category");
                self.fetcher
                    .fetch::<Category>(ApiRoute::UserCategory(category_id), &self.headers)
                    .await
                    .map_or_else(CategoryState::Failed, CategoryState::Loaded)
            }
        };
        Ok(ActionDetail { action, category })
    }
}
