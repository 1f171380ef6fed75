//! Authorization token returned by the login endpoint.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// A login token, sent verbatim as the `Authorization` header.
///
/// ServeRest returns the token with its `Bearer ` prefix already applied, so
/// no scheme is added here. `Debug` output is redacted.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a token exactly as the login endpoint returned it.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw header value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl PartialEq for AuthToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AuthToken {}
