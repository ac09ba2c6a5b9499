//! Editing a goal's custom actions and removing goals.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use super::ports::{ApiGateway, ApiRequest, FetchError};
use super::{ApiRoute, AuthHeaders, CustomAction, EntityId, decode_entity};

/// Write operations against custom actions and user goals.
pub struct CustomActionEditor<G: ?Sized> {
    gateway: Arc<G>,
    headers: AuthHeaders,
}

impl<G> CustomActionEditor<G>
where
    G: ApiGateway + ?Sized,
{
    /// Build an editor sending `headers` with every request.
    pub const fn new(gateway: Arc<G>, headers: AuthHeaders) -> Self {
        Self { gateway, headers }
    }

    /// Create a custom action under `goal` and return it as stored.
    ///
    /// # Errors
    ///
    /// Gateway failures, or [`FetchError::Decode`] when the created action
    /// cannot be read back.
    pub async fn create(&self, goal: EntityId, title: &str) -> Result<CustomAction, FetchError> {
        let request = ApiRequest::post(ApiRoute::CustomActions, body(goal, title));
        let created = self.send(&request).await?;
        decode_entity::<CustomAction>(&created)
    }

    /// Rename an existing custom action.
    ///
    /// # Errors
    ///
    /// As for [`Self::create`].
    pub async fn rename(
        &self,
        action: EntityId,
        goal: EntityId,
        title: &str,
    ) -> Result<CustomAction, FetchError> {
        let request = ApiRequest::put(ApiRoute::CustomAction(action), body(goal, title));
        let updated = self.send(&request).await?;
        decode_entity::<CustomAction>(&updated)
    }

    /// Delete a custom action.
    ///
    /// # Errors
    ///
    /// Gateway failures.
    pub async fn delete_action(&self, action: EntityId) -> Result<(), FetchError> {
        self.send(&ApiRequest::delete(ApiRoute::CustomAction(action)))
            .await
            .map(drop)
    }

    /// Remove a goal from the user's selection.
    ///
    /// # Errors
    ///
    /// Gateway failures.
    pub async fn delete_goal(&self, goal: EntityId) -> Result<(), FetchError> {
        self.send(&ApiRequest::delete(ApiRoute::UserGoal(goal)))
            .await
            .map(drop)
    }

    async fn send(&self, request: &ApiRequest) -> Result<String, FetchError> {
        debug!(
            request_id = %request.request_id,
            method = ?request.method,
            route = %request.route,
            "sending write"
        );
        self.gateway
            .send(request, &self.headers)
            .await
            .inspect_err(|err| warn!(route = %request.route, error = %err, "write failed"))
    }
}

fn body(goal: EntityId, title: &str) -> serde_json::Value {
    json!({ "title": title, "customgoal": goal })
}
