//! Reqwest-backed Compass API gateway.
//!
//! This adapter owns transport details only: URL resolution, timeout and
//! identity headers, and mapping of HTTP failures onto [`FetchError`]. It
//! hands successful bodies back as text; decoding happens in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;

use crate::domain::AuthHeaders;
use crate::domain::ports::{ApiGateway, ApiMethod, ApiRequest, FetchError};

const DEFAULT_USER_AGENT: &str = "compass-client/0.1";

/// Gateway issuing requests against one API base URL.
pub struct HttpApiGateway {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpApiGateway {
    /// Build a gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(base_url, timeout, DEFAULT_USER_AGENT)
    }

    /// Build a gateway that identifies itself with `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        base_url: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: directory_url(base_url),
            user_agent: user_agent.into(),
        })
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, FetchError> {
        self.base_url
            .join(&request.route.path())
            .map_err(|err| FetchError::transport(format!("invalid request url: {err}")))
    }

    fn builder(&self, request: &ApiRequest, url: Url) -> RequestBuilder {
        let builder = match request.method {
            ApiMethod::Get => self.client.get(url),
            ApiMethod::Post => self.client.post(url),
            ApiMethod::Put => self.client.put(url),
            ApiMethod::Delete => self.client.delete(url),
        };
        match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn send(
        &self,
        request: &ApiRequest,
        headers: &AuthHeaders,
    ) -> Result<String, FetchError> {
        let url = self.endpoint(request)?;
        let builder = headers.iter().fold(
            self.builder(request, url)
                .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
                .header("X-Request-Id", request.request_id.to_string()),
            |builder, (name, value)| builder.header(name, value),
        );

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(
            request_id = %request.request_id,
            status = status.as_u16(),
            bytes = body.len(),
            "api response received"
        );
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        String::from_utf8(body.to_vec())
            .map_err(|err| FetchError::decode(format!("response body is not UTF-8: {err}")))
    }
}

/// Ensure relative routes resolve beneath the base path.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::transport(format!("request timed out: {error}"))
    } else {
        FetchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        body_preview
    };
    FetchError::http(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
