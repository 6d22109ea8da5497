//! Client configuration and credential resolution.
//!
//! A [`ClientConfig`] is what callers write down: a host and optional
//! credentials. It is resolved once, before a client is constructed, into a
//! [`ResolvedConfig`] in which missing credentials have been filled from an
//! [`EnvSource`] or from the built-in defaults. The session client itself never
//! reads the environment.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// Environment variable supplying the default username.
pub const USERNAME_ENV: &str = "ARUBA_NETEDIT_USERNAME";

/// Environment variable supplying the default password.
pub const PASSWORD_ENV: &str = "ARUBA_NETEDIT_PASSWORD";

/// Environment variable naming the NetEdit host (CLI default and live tests).
pub const HOST_ENV: &str = "ARUBA_NETEDIT_HOST";

/// Username used when neither the config nor the environment provides one.
pub const DEFAULT_USERNAME: &str = "admin";

/// Source of environment-style variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is not set.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Connection settings as provided by the caller.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Host authority, e.g. `netedit.example.com` or `10.0.0.5:8443`.
    pub host: String,
    /// Login username; falls back to [`USERNAME_ENV`], then [`DEFAULT_USERNAME`].
    pub username: Option<String>,
    /// Login password; falls back to [`PASSWORD_ENV`], then the empty string.
    pub password: Option<String>,
}

impl ClientConfig {
    /// Creates a config for `host` with credentials left to resolution.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: None,
        }
    }

    /// Sets an explicit username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets an explicit password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Resolves missing credentials from the process environment.
    #[must_use]
    pub fn resolve(self) -> ResolvedConfig {
        self.resolve_with(&ProcessEnv)
    }

    /// Resolves missing credentials from `env`.
    ///
    /// Explicit values always win over the environment, and the environment
    /// wins over the defaults.
    #[must_use]
    pub fn resolve_with(self, env: &impl EnvSource) -> ResolvedConfig {
        let (username, username_from) = match (self.username, env.var(USERNAME_ENV)) {
            (Some(username), _) => (username, "config"),
            (None, Some(username)) => (username, "env"),
            (None, None) => (DEFAULT_USERNAME.to_string(), "default"),
        };
        let password = self
            .password
            .or_else(|| env.var(PASSWORD_ENV))
            .unwrap_or_default();

        debug!(host = %self.host, username_from, "resolved client config");

        ResolvedConfig {
            host: self.host,
            username,
            password,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Connection settings with every credential filled in.
///
/// The password is redacted in Debug output.
#[derive(Clone)]
pub struct ResolvedConfig {
    host: String,
    username: String,
    password: String,
}

impl ResolvedConfig {
    /// Returns the configured host as given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the login password.
    ///
    /// Sensitive: avoid logging the return value.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns `https://<host>`.
    ///
    /// The scheme is always HTTPS; a scheme already present in `host` is
    /// dropped, as is a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let authority = self
            .host
            .strip_prefix("https://")
            .or_else(|| self.host.strip_prefix("http://"))
            .unwrap_or(&self.host)
            .trim_end_matches('/');
        format!("https://{authority}")
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
