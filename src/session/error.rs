//! Error types for the session module.

use thiserror::Error;

/// Errors raised by [`SessionClient`](super::SessionClient) operations.
///
/// None of these are retried or recovered internally; every failure ends the
/// operation in progress and reaches the caller as-is.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server answered `POST /login` with a non-success status.
    #[error("login to {url} rejected with HTTP {status}")]
    LoginRejected {
        /// The login URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The server answered `POST /logout` with a non-success status.
    #[error("logout from {url} rejected with HTTP {status}")]
    LogoutRejected {
        /// The logout URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The login response carried no usable `Set-Cookie` header.
    #[error("login response from {url} has no Set-Cookie header with a cookie pair")]
    MissingSetCookie {
        /// The login URL.
        url: String,
    },

    /// The login cookies did not include an `XSRF-TOKEN` pair.
    #[error("login response from {url} has no XSRF-TOKEN cookie")]
    MissingXsrfToken {
        /// The login URL.
        url: String,
    },

    /// `base_url + path` did not form a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// A session artifact could not be encoded as an HTTP header value.
    #[error("session value for header {name} is not a valid header value")]
    InvalidHeader {
        /// The header name.
        name: &'static str,
    },

    /// The transport failed (DNS, TLS, connection refused, timeout, ...).
    #[error("transport error requesting {url}: {source}")]
    Transport {
        /// The URL being requested.
        url: String,
        /// The untouched transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl SessionError {
    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the HTTP status for rejected login/logout, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::LoginRejected { status, .. } | Self::LogoutRejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
