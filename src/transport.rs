//! HTTP transport seam and the default reqwest-backed client.
//!
//! The session client never talks to the network directly. It asks a
//! [`Transport`] for a request builder, finishes the request, and hands it back
//! for execution. `reqwest::Client` is the production transport; tests supply
//! their own to redirect traffic to a local mock server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Request, RequestBuilder, Response};
use url::Url;

/// Connect timeout for the default client.
///
/// No whole-request deadline is set: a response body may take as long as
/// the caller is willing to wait.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Generic "perform HTTP request, receive status/headers/body" capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Starts building a request for `method` and `url`.
    fn request(&self, method: Method, url: Url) -> RequestBuilder;

    /// Sends a finished request and returns the response with its body unread.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` on DNS, TLS, connection or
    /// timeout failures.
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error>;
}

#[async_trait]
impl Transport for Client {
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        Client::request(self, method, url)
    }

    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        Client::execute(self, request).await
    }
}

/// User-Agent sent by the default client.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("netedit-client/{version}")
}

/// Builds the default reqwest client.
///
/// No cookie store is enabled: session cookies are attached explicitly by
/// the session client, never by the transport.
///
/// # Errors
///
/// Returns the reqwest builder error when the TLS backend cannot be
/// initialized.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(default_user_agent())
        .gzip(true)
        .build()
}

/// Builds the default reqwest client, panicking on failure.
///
/// # Panics
///
/// Panics if the HTTP client builder fails with the static configuration.
/// This should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn default_http_client() -> Client {
    build_http_client().expect("failed to build HTTP client with static configuration")
}
