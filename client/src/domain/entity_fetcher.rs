//! Single-request entity fetcher.
//!
//! One call issues exactly one `GET` through the [`ApiGateway`] port and maps
//! the body into a typed entity. No retries happen here; retrying is the
//! caller's decision. Failures are returned as values and logged once:
//! decode failures at `error` level because they mean the API broke its
//! contract, everything else at `warn`.

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::ports::{ApiGateway, ApiRequest, FetchError};
use super::{ApiRoute, AuthHeaders, Entity, ResultsPage};

/// Tagged result of one fetch: the decoded entity or the failure reason.
pub type FetchOutcome<T> = Result<T, FetchError>;

/// Fetches and decodes entities through an [`ApiGateway`].
pub struct EntityFetcher<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G: ?Sized> Clone for EntityFetcher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> EntityFetcher<G>
where
    G: ApiGateway + ?Sized,
{
    /// Wrap a gateway.
    pub const fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Fetch one entity.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`FetchError`] unchanged, or
    /// [`FetchError::Decode`] when the body is not a valid `E`.
    pub async fn fetch<E: Entity>(
        &self,
        route: ApiRoute,
        headers: &AuthHeaders,
    ) -> FetchOutcome<E> {
        let body = self.get(route, headers).await?;
        decode_entity::<E>(&body).inspect_err(|err| log_failure(E::KIND, route, err))
    }

    /// Fetch a `{"results": [...]}` list. An empty or `null` body decodes as
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`FetchError`] unchanged, or
    /// [`FetchError::Decode`] when the body is not a list of `E`.
    pub async fn fetch_list<E: Entity>(
        &self,
        route: ApiRoute,
        headers: &AuthHeaders,
    ) -> FetchOutcome<Vec<E>> {
        let body = self.get(route, headers).await?;
        decode_list::<E>(&body).inspect_err(|err| log_failure(E::KIND, route, err))
    }

    async fn get(&self, route: ApiRoute, headers: &AuthHeaders) -> FetchOutcome<String> {
        let request = ApiRequest::get(route);
        debug!(request_id = %request.request_id, %route, "issuing fetch");
        self.gateway
            .send(&request, headers)
            .await
            .inspect_err(|err| log_failure("response", route, err))
    }
}

/// Decode one entity from a UTF-8 JSON body.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when the body does not match `E`.
///
/// # Examples
/// ```
/// use compass::domain::{decode_entity, Badge, EntityId};
///
/// let badge: Badge = decode_entity(r#"{"id": 3, "name": "Early bird"}"#).unwrap();
/// assert_eq!(badge.id, EntityId::new(3));
/// assert!(decode_entity::<Badge>(r#"{"name": "no id"}"#).is_err());
/// ```
pub fn decode_entity<E: Entity>(body: &str) -> FetchOutcome<E> {
    serde_json::from_str(body)
        .map_err(|err| FetchError::decode(format!("invalid {} payload: {err}", E::KIND)))
}

/// Decode a results page into its items; absent or empty bodies are empty.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when the body is present but malformed.
pub fn decode_list<E: Entity>(body: &str) -> FetchOutcome<Vec<E>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str::<ResultsPage<E>>(trimmed)
        .map(ResultsPage::into_results)
        .map_err(|err| FetchError::decode(format!("invalid {} list payload: {err}", E::KIND)))
}

fn log_failure(kind: &str, route: ApiRoute, err: &FetchError) {
    if err.is_contract_break() {
        error!(kind, %route, error = %err, "api contract violated");
    } else {
        warn!(kind, %route, error = %err, "fetch failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockApiGateway;
    use crate::domain::{CustomAction, EntityId, UserGoal};
    use rstest::rstest;

    fn fetcher(gateway: MockApiGateway) -> EntityFetcher<MockApiGateway> {
        EntityFetcher::new(Arc::new(gateway))
    }

    fn gateway_returning(response: FetchOutcome<String>) -> MockApiGateway {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .times(1)
            .returning(move |_, _| response.clone());
        gateway
    }

    #[tokio::test]
    async fn decodes_successful_bodies() {
        let body = r#"{"id": 42, "goal": {"id": 1, "title": "Walk more"}}"#.to_owned();
        let goal: UserGoal = fetcher(gateway_returning(Ok(body)))
            .fetch(ApiRoute::UserGoal(EntityId::new(42)), &AuthHeaders::anonymous())
            .await
            .expect("goal should decode");
        assert_eq!(goal.title(), "Walk more");
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_decode_failure() {
        let outcome = fetcher(gateway_returning(Ok(r#"{"id": "forty-two"}"#.to_owned())))
            .fetch::<UserGoal>(ApiRoute::UserGoal(EntityId::new(42)), &AuthHeaders::anonymous())
            .await;
        assert!(matches!(outcome, Err(FetchError::Decode { .. })));
    }

    #[rstest]
    #[case(FetchError::http(404_u16, "not found"))]
    #[case(FetchError::transport("connection reset"))]
    #[tokio::test]
    async fn gateway_failures_pass_through(#[case] failure: FetchError) {
        let outcome = fetcher(gateway_returning(Err(failure.clone())))
            .fetch::<UserGoal>(ApiRoute::UserGoal(EntityId::new(42)), &AuthHeaders::anonymous())
            .await;
        assert_eq!(outcome, Err(failure));
    }

    #[tokio::test]
    async fn issues_exactly_one_get_for_the_route() {
        let route = ApiRoute::UserGoal(EntityId::new(7));
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(move |request, _| {
                request.route == route && request.method == crate::domain::ports::ApiMethod::Get
            })
            .times(1)
            .returning(|_, _| Err(FetchError::http(500_u16, "boom")));

        let outcome = fetcher(gateway)
            .fetch::<UserGoal>(route, &AuthHeaders::anonymous())
            .await;
        assert!(outcome.is_err());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("null")]
    #[case("{}")]
    #[case(r#"{"results": []}"#)]
    #[case(r#"{"count": 0, "results": null}"#)]
    fn absent_lists_decode_as_empty(#[case] body: &str) {
        let actions = decode_list::<CustomAction>(body).expect("empty list");
        assert!(actions.is_empty());
    }

    #[test]
    fn malformed_lists_are_decode_failures() {
        let outcome = decode_list::<CustomAction>(r#"{"results": [{"title": "no id"}]}"#);
        assert!(matches!(outcome, Err(FetchError::Decode { .. })));
    }
}
