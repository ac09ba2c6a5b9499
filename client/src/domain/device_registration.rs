//! Forwarding a push-notification registration token to the API.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use super::ports::{ApiGateway, ApiRequest, FetchError};
use super::{ApiRoute, AuthHeaders};

/// Device type reported with every registration.
pub const DEVICE_TYPE: &str = "ios";

/// Failures when registering a device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The token was empty or whitespace.
    #[error("registration token must not be blank")]
    BlankToken,
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] FetchError),
}

/// Sends registration tokens to the notifications endpoint.
pub struct DeviceRegistration<G: ?Sized> {
    gateway: Arc<G>,
    headers: AuthHeaders,
    device_name: String,
}

impl<G> DeviceRegistration<G>
where
    G: ApiGateway + ?Sized,
{
    /// Build a registration client naming the device `device_name`.
    pub fn new(gateway: Arc<G>, headers: AuthHeaders, device_name: impl Into<String>) -> Self {
        Self {
            gateway,
            headers,
            device_name: device_name.into(),
        }
    }

    /// Forward `token`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::BlankToken`] without contacting the API, or the
    /// API failure.
    pub async fn forward_token(&self, token: &str) -> Result<(), RegistrationError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RegistrationError::BlankToken);
        }
        let request = ApiRequest::post(
            ApiRoute::Devices,
            json!({
                "registration_id": token,
                "device_name": self.device_name,
                "device_type": DEVICE_TYPE,
            }),
        );
        match self.gateway.send(&request, &self.headers).await {
            Ok(_) => {
                info!(device_name = %self.device_name, "device registered");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "device registration failed");
                Err(err.into())
            }
        }
    }
}
