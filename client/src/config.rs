//! Client configuration loaded via OrthoConfig.

use std::ffi::OsString;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{Session, SessionValidationError};

const DEFAULT_API_BASE_URL: &str = "https://app.tndata.org/api/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FLAGS_DIR: &str = "./.compass";
const DEFAULT_USER_AGENT: &str = "compass-client/0.1";
const DEFAULT_DEVICE_NAME: &str = "compass-cli";

/// Problems with the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Sources could not be read or merged.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error text.
        message: String,
    },
    /// `COMPASS_API_BASE_URL` is not an absolute http(s) URL.
    #[error("invalid API base URL `{url}`: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// Parser error text.
        message: String,
    },
    /// `COMPASS_API_TOKEN` is set but unusable.
    #[error("invalid API token: {0}")]
    InvalidToken(#[from] SessionValidationError),
}

/// Settings for the Compass client, read from `COMPASS_*` variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMPASS")]
pub struct ClientSettings {
    /// API root; routes resolve beneath it.
    pub api_base_url: Option<String>,
    /// Token of the signed-in user.
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Directory holding the flag store.
    pub flags_dir: Option<String>,
    /// User agent sent with API requests.
    pub user_agent: Option<String>,
    /// Device name reported on push registration.
    pub device_name: Option<String>,
}

impl ClientSettings {
    /// Load settings from the environment and configuration files, ignoring
    /// command-line arguments (those belong to the command parser).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Load`] when a source cannot be merged.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("compass")]).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Parsed API base URL.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] for unparsable or non-http(s) values.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        let invalid = |message: String| ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            message,
        };
        let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }

    /// Session for the configured token, if any.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidToken`] when a token is set but malformed.
    pub fn session(&self) -> Result<Option<Session>, ConfigError> {
        self.api_token
            .as_deref()
            .map(Session::try_from_token)
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Request timeout, falling back to the default.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Flag store directory, falling back to the default.
    pub fn flags_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.flags_dir.as_deref().unwrap_or(DEFAULT_FLAGS_DIR))
    }

    /// User agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Device name, falling back to the default.
    pub fn device_name(&self) -> &str {
        self.device_name.as_deref().unwrap_or(DEFAULT_DEVICE_NAME)
    }
}
