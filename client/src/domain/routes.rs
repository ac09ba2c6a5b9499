//! Relative API paths for every resource the client touches.
//!
//! Paths are relative to the configured API base URL (which must end with
//! `/`) and keep the trailing slash the API expects.

use std::fmt;

use super::EntityId;

/// One addressable API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiRoute {
    /// A user goal by id.
    UserGoal(EntityId),
    /// Custom actions belonging to one user goal.
    CustomActionsForGoal(EntityId),
    /// Collection endpoint for creating custom actions.
    CustomActions,
    /// One custom action by id.
    CustomAction(EntityId),
    /// A user action by id.
    UserAction(EntityId),
    /// A user category by id.
    UserCategory(EntityId),
    /// One randomly chosen reward (served as a single-item list).
    RandomReward,
    /// Push-notification device registrations.
    Devices,
}

impl ApiRoute {
    /// Path relative to the API base URL, including any query string.
    ///
    /// # Examples
    /// ```
    /// use compass::domain::{ApiRoute, EntityId};
    ///
    /// assert_eq!(ApiRoute::UserGoal(EntityId::new(42)).path(), "users/goals/42/");
    /// ```
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::UserGoal(id) => format!("users/goals/{id}/"),
            Self::CustomActionsForGoal(goal) => format!("users/customactions/?customgoal={goal}"),
            Self::CustomActions => "users/customactions/".to_owned(),
            Self::CustomAction(id) => format!("users/customactions/{id}/"),
            Self::UserAction(id) => format!("users/actions/{id}/"),
            Self::UserCategory(id) => format!("users/categories/{id}/"),
            Self::RandomReward => "rewards/?random=1".to_owned(),
            Self::Devices => "notifications/devices/".to_owned(),
        }
    }
}

impl fmt::Display for ApiRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiRoute::CustomActionsForGoal(EntityId::new(4)), "users/customactions/?customgoal=4")]
    #[case(ApiRoute::CustomAction(EntityId::new(8)), "users/customactions/8/")]
    #[case(ApiRoute::UserAction(EntityId::new(2)), "users/actions/2/")]
    #[case(ApiRoute::UserCategory(EntityId::new(3)), "users/categories/3/")]
    #[case(ApiRoute::RandomReward, "rewards/?random=1")]
    #[case(ApiRoute::Devices, "notifications/devices/")]
    fn routes_render_relative_paths(#[case] route: ApiRoute, #[case] expected: &str) {
        assert_eq!(route.path(), expected);
        assert!(!route.path().starts_with('/'), "paths must stay relative");
    }
}
