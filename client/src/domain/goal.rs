//! User goals and the custom actions a user attaches to them.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, ResultsPage, Trigger};

/// Library content shared by every user who selected the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalContent {
    /// Library identifier.
    pub id: EntityId,
    /// Goal title.
    #[serde(default)]
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
}

/// A goal the user has selected, as served by `users/goals/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoal {
    /// User-goal identifier (distinct from the library goal id).
    pub id: EntityId,
    /// Library content for the goal.
    pub goal: GoalContent,
    /// Category the goal is primarily filed under, if any.
    #[serde(default)]
    pub primary_category: Option<EntityId>,
}

impl UserGoal {
    /// Goal title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.goal.title.as_str()
    }

    /// Goal description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.goal.description.as_str()
    }
}

impl Entity for UserGoal {
    const KIND: &'static str = "goal";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// An action the user wrote for one of their goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAction {
    /// API identifier.
    pub id: EntityId,
    /// Action title as typed by the user.
    #[serde(default)]
    pub title: String,
    /// Goal the action belongs to.
    #[serde(default)]
    pub customgoal: Option<EntityId>,
    /// Reminder attached to the action.
    #[serde(default)]
    pub trigger: Option<Trigger>,
}

impl CustomAction {
    /// Replace the reminder after the user saved a new schedule.
    ///
    /// # Examples
    /// ```
    /// use compass::domain::{CustomAction, EntityId, Trigger};
    ///
    /// let mut action: CustomAction =
    ///     serde_json::from_str(r#"{"id": 3, "title": "Walk"}"#).expect("action");
    /// let trigger: Trigger = serde_json::from_str(r#"{"id": 8}"#).expect("trigger");
    /// action.attach_trigger(trigger);
    /// assert_eq!(action.trigger.map(|t| t.id), Some(EntityId::new(8)));
    /// ```
    pub fn attach_trigger(&mut self, trigger: Trigger) {
        self.trigger = Some(trigger);
    }
}

impl Entity for CustomAction {
    const KIND: &'static str = "custom_action";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Custom actions listed for one goal.
pub type CustomActionList = ResultsPage<CustomAction>;
