//! Library actions the user is subscribed to.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Trigger};

/// Library content for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContent {
    /// Library identifier.
    pub id: EntityId,
    /// Action title.
    #[serde(default)]
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
}

/// An action as served by `users/actions/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAction {
    /// User-action identifier.
    pub id: EntityId,
    /// Library content.
    pub action: ActionContent,
    /// Category used to pick the hero image.
    #[serde(default)]
    pub primary_category: Option<EntityId>,
    /// Reminder attached to the action.
    #[serde(default)]
    pub trigger: Option<Trigger>,
}

impl UserAction {
    /// Action title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.action.title.as_str()
    }
}

impl Entity for UserAction {
    const KIND: &'static str = "action";

    fn id(&self) -> EntityId {
        self.id
    }
}
