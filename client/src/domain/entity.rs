//! Identity primitives shared by every record decoded from the Compass API.
//!
//! Entities are decoded once and then treated as immutable snapshots. The
//! only sanctioned post-decode mutation is attaching a freshly saved trigger
//! to a custom action (see [`crate::domain::CustomAction::attach_trigger`]).

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Integer identifier assigned to an entity by the remote API.
///
/// # Examples
/// ```
/// use compass::domain::EntityId;
///
/// let id = EntityId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wrap a raw API identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value as sent over the wire.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed record decoded from a JSON object.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Short label used in logs and analytics (`"goal"`, `"badge"`, ...).
    const KIND: &'static str;

    /// Identifier assigned by the API.
    fn id(&self) -> EntityId;
}

/// Paginated list envelope used by list endpoints (`{"results": [...]}`).
///
/// A missing or `null` `results` key decodes as an empty page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct ResultsPage<T> {
    #[serde(default)]
    results: Option<Vec<T>>,
}

impl<T> Default for ResultsPage<T> {
    fn default() -> Self {
        Self { results: None }
    }
}

impl<T> ResultsPage<T> {
    /// Consume the envelope and return its items in API order.
    pub fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn entity_ids_decode_from_bare_integers() {
        let id: EntityId = serde_json::from_str("17").expect("integer id");
        assert_eq!(id, EntityId::new(17));
    }

    #[rstest]
    #[case("{}")]
    #[case(r#"{"results": null}"#)]
    #[case(r#"{"count": 0, "results": []}"#)]
    fn pages_without_results_are_empty(#[case] body: &str) {
        let page: ResultsPage<EntityId> = serde_json::from_str(body).expect("empty page");
        assert!(page.into_results().is_empty());
    }

    #[test]
    fn pages_preserve_api_order() {
        let page: ResultsPage<EntityId> =
            serde_json::from_str(r#"{"count": 3, "results": [3, 1, 2]}"#).expect("page");
        assert_eq!(
            page.into_results(),
            vec![EntityId::new(3), EntityId::new(1), EntityId::new(2)]
        );
    }
}
