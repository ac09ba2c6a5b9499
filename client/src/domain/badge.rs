//! Badges awarded for progress.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// An earned badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// API identifier, also used as the award identifier.
    pub id: EntityId,
    /// Badge name.
    #[serde(default)]
    pub name: String,
    /// What the badge was awarded for.
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

impl Entity for Badge {
    const KIND: &'static str = "badge";

    fn id(&self) -> EntityId {
        self.id
    }
}
