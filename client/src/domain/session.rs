//! Authenticated session credentials and the header map derived from them.
//!
//! Keep raw configuration parsing outside the domain: callers construct a
//! [`Session`] from a token string and hand the derived [`AuthHeaders`] to
//! every request.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

/// Error returned when a session token is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Token was missing or blank once trimmed.
    EmptyToken,
    /// Token contained whitespace or control characters.
    MalformedToken,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "session token must not be empty"),
            Self::MalformedToken => {
                write!(f, "session token must not contain whitespace or control characters")
            }
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// A logged-in user's API session.
///
/// ## Invariants
/// - the token is trimmed, non-empty and free of whitespace.
///
/// # Examples
/// ```
/// use compass::domain::Session;
///
/// let session = Session::try_from_token(" abc123 ").unwrap();
/// let headers = session.header_map();
/// assert_eq!(headers.get("Authorization"), Some("Token abc123"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Zeroizing<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

impl Session {
    /// Build a session from a raw API token.
    pub fn try_from_token(token: &str) -> Result<Self, SessionValidationError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SessionValidationError::EmptyToken);
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(SessionValidationError::MalformedToken);
        }
        Ok(Self {
            token: Zeroizing::new(trimmed.to_owned()),
        })
    }

    /// Headers every authenticated request must carry.
    #[must_use]
    pub fn header_map(&self) -> AuthHeaders {
        let mut headers = AuthHeaders::default();
        headers.insert("Authorization", format!("Token {}", self.token.as_str()));
        headers.insert("Accept", "application/json");
        headers
    }
}

/// Header map attached to outgoing API requests.
///
/// An empty map is valid and is used for public endpoints such as the
/// random reward feed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders(BTreeMap<String, String>);

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        f.debug_struct("AuthHeaders").field("names", &names).finish()
    }
}

impl AuthHeaders {
    /// Map with no headers, for unauthenticated endpoints.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Insert or replace one header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a header value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate headers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Whether the map carries no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", SessionValidationError::EmptyToken)]
    #[case("   ", SessionValidationError::EmptyToken)]
    #[case("abc def", SessionValidationError::MalformedToken)]
    #[case("abc\u{7}", SessionValidationError::MalformedToken)]
    fn invalid_tokens_are_rejected(#[case] token: &str, #[case] expected: SessionValidationError) {
        let err = Session::try_from_token(token).expect_err("invalid token must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::try_from_token("secret-token").expect("valid token");
        let rendered = format!("{session:?} {:?}", session.header_map());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("Authorization"));
    }

    #[test]
    fn anonymous_headers_are_empty() {
        assert!(AuthHeaders::anonymous().is_empty());
    }
}
