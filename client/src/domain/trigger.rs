//! Reminder triggers attached to actions.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// A reminder schedule as returned by the API.
///
/// `time`, `date` and `recurrences` are kept in the API's textual form
/// (`"08:30:00"`, `"2016-07-15"`, RRULE text); `recurrences_display` is the
/// server-rendered human summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// API identifier.
    pub id: EntityId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Time of day the reminder fires.
    #[serde(default)]
    pub time: String,
    /// First date the reminder fires.
    #[serde(default)]
    pub date: String,
    /// Recurrence rule text.
    #[serde(default)]
    pub recurrences: String,
    /// Human-readable recurrence summary.
    #[serde(default)]
    pub recurrences_display: String,
    /// Whether the user switched the reminder off.
    #[serde(default)]
    pub disabled: bool,
}

impl Trigger {
    /// Whether the reminder will fire at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Summary to show next to an action, preferring the server rendering.
    #[must_use]
    pub fn summary(&self) -> &str {
        if self.recurrences_display.trim().is_empty() {
            self.time.as_str()
        } else {
            self.recurrences_display.as_str()
        }
    }
}

impl Entity for Trigger {
    const KIND: &'static str = "trigger";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn missing_optional_fields_take_defaults() {
        let trigger: Trigger = serde_json::from_str(r#"{"id": 9}"#).expect("minimal trigger");
        assert_eq!(trigger.id, EntityId::new(9));
        assert!(trigger.is_enabled());
        assert_eq!(trigger.summary(), "");
    }

    #[rstest]
    #[case("", "08:30:00", "08:30:00")]
    #[case("Every weekday", "08:30:00", "Every weekday")]
    fn summary_prefers_server_rendering(
        #[case] display: &str,
        #[case] time: &str,
        #[case] expected: &str,
    ) {
        let trigger = Trigger {
            id: EntityId::new(1),
            name: "Morning".to_owned(),
            time: time.to_owned(),
            date: String::new(),
            recurrences: String::new(),
            recurrences_display: display.to_owned(),
            disabled: false,
        };
        assert_eq!(trigger.summary(), expected);
    }
}
