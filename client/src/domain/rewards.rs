//! Random reward shown beneath goal content.

use std::sync::Arc;

use super::ports::{ApiGateway, FetchError};
use super::{ApiRoute, AuthHeaders, EntityFetcher, Reward};

/// What the reward region shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardPanel {
    /// Nothing could be loaded; the region stays hidden.
    Hidden,
    /// A reward with its header and optional attribution.
    Shown {
        /// Header line for the reward kind.
        header: &'static str,
        /// Reward text.
        message: String,
        /// Author, for quotes only.
        attribution: Option<String>,
    },
}

impl From<&Reward> for RewardPanel {
    fn from(reward: &Reward) -> Self {
        Self::Shown {
            header: reward.header_title(),
            message: reward.message.clone(),
            attribution: reward.attribution().map(str::to_owned),
        }
    }
}

/// Loads random rewards.
pub struct RewardService<G: ?Sized> {
    fetcher: EntityFetcher<G>,
    headers: AuthHeaders,
}

impl<G> RewardService<G>
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

    /// Fetch one random reward.
    ///
    /// # Errors
    ///
    /// Gateway and decode failures; an empty result list is reported as
    /// [`FetchError::Decode`].
    pub async fn random_reward(&self) -> Result<Reward, FetchError> {
        self.fetcher
            .fetch_list::<Reward>(ApiRoute::RandomReward, &self.headers)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::decode("random reward list was empty"))
    }

    /// Fetch a reward and turn it into a panel; failures hide the panel.
    pub async fn panel(&self) -> RewardPanel {
        self.random_reward()
            .await
            .map_or(RewardPanel::Hidden, |reward| RewardPanel::from(&reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureApiGateway;
    use rstest::rstest;

    fn service(response: Result<String, FetchError>) -> RewardService<FixtureApiGateway> {
        let gateway = FixtureApiGateway::default();
        gateway.respond(ApiRoute::RandomReward, response);
        RewardService::new(Arc::new(gateway), AuthHeaders::anonymous())
    }

    #[tokio::test]
    async fn quote_panel_carries_attribution() {
        let body = r#"{"results": [{"id": 1, "message_type": "quote",
            "message": "Well begun is half done.", "author": "Aristotle"}]}"#;
        let panel = service(Ok(body.to_owned())).panel().await;
        assert_eq!(
            panel,
            RewardPanel::Shown {
                header: "A thought for the day",
                message: "Well begun is half done.".to_owned(),
                attribution: Some("Aristotle".to_owned()),
            }
        );
    }

    #[tokio::test]
    async fn empty_list_is_a_decode_failure() {
        let outcome = service(Ok(r#"{"results": []}"#.to_owned()))
            .random_reward()
            .await;
        assert!(matches!(outcome, Err(FetchError::Decode { .. })));
    }

    #[rstest]
    #[case(Err(FetchError::transport("offline")))]
    #[case(Err(FetchError::http(500_u16, "boom")))]
    #[case(Ok("not json".to_owned()))]
    #[tokio::test]
    async fn failures_hide_the_panel(#[case] response: Result<String, FetchError>) {
        assert_eq!(service(response).panel().await, RewardPanel::Hidden);
    }
}
