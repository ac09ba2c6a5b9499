//! Motivational rewards (quotes, fortunes, facts and jokes).

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, ResultsPage};

/// Kind of reward message, taken from the API's `message_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Attributed quotation.
    Quote,
    /// Fortune-cookie message.
    Fortune,
    /// Fun fact.
    Fact,
    /// Joke.
    Joke,
    /// Any message type this client does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl RewardKind {
    /// Header shown above the reward message.
    #[must_use]
    pub const fn header_title(self) -> &'static str {
        match self {
            Self::Quote => "A thought for the day",
            Self::Fortune => "Here's a fortune cookie for you",
            Self::Fact => "Here's a fun fact for you",
            Self::Joke => "Here's a joke for you",
            Self::Unknown => "",
        }
    }
}

/// One reward message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// API identifier.
    pub id: EntityId,
    /// Message kind.
    #[serde(default)]
    pub message_type: RewardKind,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// Author, meaningful for quotes only.
    #[serde(default)]
    pub author: String,
}

impl Reward {
    /// Header shown above the message.
    #[must_use]
    pub const fn header_title(&self) -> &'static str {
        self.message_type.header_title()
    }

    /// Author line; only quotes carry an attribution.
    ///
    /// # Examples
    /// ```
    /// use compass::domain::Reward;
    ///
    /// let joke: Reward = serde_json::from_str(
    ///     r#"{"id": 1, "message_type": "joke", "message": "...", "author": "anon"}"#,
    /// ).expect("reward");
    /// assert_eq!(joke.attribution(), None);
    /// ```
    #[must_use]
    pub fn attribution(&self) -> Option<&str> {
        match self.message_type {
            RewardKind::Quote => Some(self.author.as_str()),
            _ => None,
        }
    }
}

impl Entity for Reward {
    const KIND: &'static str = "reward";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Page returned by the random-reward endpoint.
pub type RewardList = ResultsPage<Reward>;
