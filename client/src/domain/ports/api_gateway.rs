//! Driven port for talking to the Compass REST API.
//!
//! The domain owns the request shape and the failure taxonomy; adapters own
//! transport details. A gateway returns the response body as UTF-8 text and
//! never decodes it: typed decoding happens in
//! [`crate::domain::EntityFetcher`].

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{ApiRoute, AuthHeaders};

/// HTTP verb for an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Remove a resource.
    Delete,
}

/// Domain-owned request passed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Correlation id carried into logs.
    pub request_id: Uuid,
    /// HTTP verb.
    pub method: ApiMethod,
    /// Target resource.
    pub route: ApiRoute,
    /// JSON body for `POST` and `PUT`.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: ApiMethod, route: ApiRoute, body: Option<Value>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method,
            route,
            body,
        }
    }

    /// `GET` the route.
    #[must_use]
    pub fn get(route: ApiRoute) -> Self {
        Self::new(ApiMethod::Get, route, None)
    }

    /// `POST` a JSON body to the route.
    #[must_use]
    pub fn post(route: ApiRoute, body: Value) -> Self {
        Self::new(ApiMethod::Post, route, Some(body))
    }

    /// `PUT` a JSON body to the route.
    #[must_use]
    pub fn put(route: ApiRoute, body: Value) -> Self {
        Self::new(ApiMethod::Put, route, Some(body))
    }

    /// `DELETE` the route.
    #[must_use]
    pub fn delete(route: ApiRoute) -> Self {
        Self::new(ApiMethod::Delete, route, None)
    }
}

define_port_error! {
    /// Failure reasons for one API round trip.
    pub enum FetchError {
        /// The request never produced a response (unreachable, timeout, TLS).
        Transport { message: String } =>
            "api transport failed: {message}",
        /// The API answered with a non-2xx status.
        Http { status: u16, message: String } =>
            "api returned status {status}: {message}",
        /// The body did not match the expected entity shape.
        Decode { message: String } =>
            "api response decode failed: {message}",
    }
}

impl FetchError {
    /// Whether a user-initiated retry may succeed. Every failure kind is
    /// recoverable by retrying; none is fatal to the process.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        true
    }

    /// Whether the failure indicates the API broke its response contract.
    #[must_use]
    pub const fn is_contract_break(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// HTTP status for [`Self::Http`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for issuing requests against the Compass API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Send one request and return the body of a successful response.
    ///
    /// Implementations perform no retries; non-2xx statuses map to
    /// [`FetchError::Http`] and transport failures to
    /// [`FetchError::Transport`].
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use compass::domain::{ApiRoute, AuthHeaders, EntityId};
    /// use compass::domain::ports::{ApiGateway, ApiRequest, FixtureApiGateway};
    ///
    /// let gateway = FixtureApiGateway::default();
    /// gateway.respond(ApiRoute::UserGoal(EntityId::new(1)), Ok("{}".to_owned()));
    /// let body = gateway
    ///     .send(&ApiRequest::get(ApiRoute::UserGoal(EntityId::new(1))), &AuthHeaders::anonymous())
    ///     .await?;
    /// assert_eq!(body, "{}");
    /// # Ok::<(), compass::domain::ports::FetchError>(())
    /// ```
    async fn send(&self, request: &ApiRequest, headers: &AuthHeaders)
    -> Result<String, FetchError>;
}

/// Fixture gateway serving canned responses keyed by route.
///
/// Unconfigured routes answer with `404`. Every request is recorded so tests
/// can assert how many fetches were issued.
#[derive(Debug, Default)]
pub struct FixtureApiGateway {
    responses: Mutex<BTreeMap<String, Result<String, FetchError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FixtureApiGateway {
    /// Configure the response for a route, replacing any previous one.
    pub fn respond(&self, route: ApiRoute, response: Result<String, FetchError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route.path(), response);
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received for one route.
    #[must_use]
    pub fn request_count(&self, route: ApiRoute) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.route == route)
            .count()
    }
}

#[async_trait]
impl ApiGateway for FixtureApiGateway {
    async fn send(
        &self,
        request: &ApiRequest,
        _headers: &AuthHeaders,
    ) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request.route.path())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::http(404_u16, "no fixture response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;
    use rstest::rstest;

    #[rstest]
    #[case(FetchError::transport("connection refused"), false)]
    #[case(FetchError::http(503_u16, "unavailable"), false)]
    #[case(FetchError::decode("missing field `id`"), true)]
    fn only_decode_failures_break_the_contract(#[case] error: FetchError, #[case] expected: bool) {
        assert!(error.is_retryable());
        assert_eq!(error.is_contract_break(), expected);
    }

    #[test]
    fn http_errors_expose_their_status() {
        assert_eq!(FetchError::http(404_u16, "missing").status(), Some(404));
        assert_eq!(FetchError::transport("down").status(), None);
    }

    #[tokio::test]
    async fn fixture_gateway_defaults_to_not_found_and_records_requests() {
        let gateway = FixtureApiGateway::default();
        let route = ApiRoute::UserGoal(EntityId::new(42));

        let result = gateway
            .send(&ApiRequest::get(route), &AuthHeaders::anonymous())
            .await;

        assert_eq!(result.map_err(|err| err.status()), Err(Some(404)));
        assert_eq!(gateway.request_count(route), 1);
    }

    #[test]
    fn requests_carry_distinct_correlation_ids() {
        let route = ApiRoute::RandomReward;
        assert_ne!(
            ApiRequest::get(route).request_id,
            ApiRequest::get(route).request_id
        );
    }
}
