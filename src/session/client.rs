//! Authenticated NetEdit session client.
//!
//! [`SessionClient`] logs in with a username/password form, keeps the
//! session cookie and CSRF token returned by the server, attaches both to
//! every later request, and logs out to invalidate the session.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{COOKIE, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Request, Response};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::cookies::{cookie_header_from_set_cookie, folded_set_cookie, xsrf_token_from_cookie};
use super::error::SessionError;
use super::options::RequestOptions;
use crate::config::{ClientConfig, ResolvedConfig};
use crate::transport::{Transport, default_http_client};

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/login";

/// Logout endpoint path.
pub const LOGOUT_PATH: &str = "/logout";

/// Request header carrying the CSRF token.
pub const XSRF_HEADER: &str = "x-xsrf-token";

/// Cookie string and CSRF token from a successful login.
///
/// Both values are redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
struct SessionArtifacts {
    cookie: String,
    token: String,
}

impl fmt::Debug for SessionArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionArtifacts")
            .field("cookie", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Session dimension of the client: either no artifacts or both of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(SessionArtifacts),
}

/// Client holding one user's credentials and at most one session on one host.
///
/// `login` and `logout` take `&mut self`, so a client has a single writer at a
/// time. To share one across tasks, wrap it in a `tokio::sync::Mutex`; for
/// independent concurrent sessions, construct one client per session.
///
/// # Example
///
/// ```no_run
/// use netedit_client::{ClientConfig, RequestOptions, SessionClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("netedit.example.com").resolve();
/// let mut client = SessionClient::new(config);
/// client.login().await?;
/// let response = client.request("/actuator/info", RequestOptions::new()).await?;
/// println!("{}", response.text().await?);
/// client.logout().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionClient {
    base_url: String,
    username: String,
    password: String,
    session: SessionState,
    transport: Arc<dyn Transport>,
}

impl SessionClient {
    /// Creates a client over the default reqwest transport.
    ///
    /// No network activity happens here.
    ///
    /// # Panics
    ///
    /// Panics if the default HTTP client cannot be built. This should never
    /// happen in practice.
    #[must_use]
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_transport(config, Arc::new(default_http_client()))
    }

    /// Creates a client that sends through `transport`.
    #[must_use]
    pub fn with_transport(config: ResolvedConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url(),
            username: config.username().to_string(),
            password: config.password().to_string(),
            session: SessionState::Unauthenticated,
            transport,
        }
    }

    /// Returns `https://<host>`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns whether a login has succeeded without a later logout.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, SessionState::Authenticated(_))
    }

    /// Logs in with `POST /login` and stores the session artifacts.
    ///
    /// The form carries `username` and `password`; the response body is
    /// discarded. Logging in again while authenticated replaces the stored
    /// session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LoginRejected`] for a non-success status
    /// - [`SessionError::MissingSetCookie`] when no cookie pair came back
    /// - [`SessionError::MissingXsrfToken`] when no `XSRF-TOKEN` cookie came back
    /// - any error of [`request`](Self::request)
    ///
    /// The session state is left untouched on every error.
    #[instrument(skip(self), fields(base_url = %self.base_url, username = %self.username))]
    pub async fn login(&mut self) -> Result<(), SessionError> {
        let url = self.url_string(LOGIN_PATH);
        let form = Form::new()
            .text("username", self.username.clone())
            .text("password", self.password.clone());

        let response = self
            .request(LOGIN_PATH, RequestOptions::post().multipart(form))
            .await?;
        let status = response.status();
        let set_cookie = folded_set_cookie(response.headers());
        drop(response);

        if !status.is_success() {
            warn!(status = status.as_u16(), "login rejected");
            return Err(SessionError::LoginRejected {
                url,
                status: status.as_u16(),
            });
        }

        let cookie = set_cookie
            .as_deref()
            .and_then(cookie_header_from_set_cookie)
            .ok_or_else(|| SessionError::MissingSetCookie { url: url.clone() })?;
        let token = xsrf_token_from_cookie(&cookie)
            .ok_or_else(|| SessionError::MissingXsrfToken { url })?
            .to_string();

        if self.is_authenticated() {
            debug!("replacing existing session");
        }
        self.session = SessionState::Authenticated(SessionArtifacts { cookie, token });
        info!("logged in");
        Ok(())
    }

    /// Logs out with `POST /logout` and clears the session artifacts.
    ///
    /// Calling this while unauthenticated still sends the request, with empty
    /// `Cookie` and `X-XSRF-TOKEN` values; whether that succeeds is up to the
    /// server.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LogoutRejected`] for a non-success status, or
    /// any error of [`request`](Self::request). The session is kept on error.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if !self.is_authenticated() {
            warn!("logout requested without an active session");
        }

        let response = self.request(LOGOUT_PATH, RequestOptions::post()).await?;
        let status = response.status();
        drop(response);

        if !status.is_success() {
            warn!(status = status.as_u16(), "logout rejected");
            return Err(SessionError::LogoutRejected {
                url: self.url_string(LOGOUT_PATH),
                status: status.as_u16(),
            });
        }

        self.session = SessionState::Unauthenticated;
        info!("logged out");
        Ok(())
    }

    /// Sends a request to `base_url + path` with the session attached.
    ///
    /// `Cookie` and `X-XSRF-TOKEN` are always overwritten with the session
    /// values, or with empty values when unauthenticated. The response is
    /// returned with its body unread; no status check and no retry happen.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidUrl`] when `base_url + path` is not a URL
    /// - [`SessionError::InvalidHeader`] when a session value is not a valid
    ///   header value
    /// - [`SessionError::Transport`] wrapping the transport's own error, including
    ///   failures to assemble the request
    #[instrument(level = "debug", skip(self, options), fields(method = %options.method_ref()))]
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, SessionError> {
        let request = self.build_request(path, options)?;
        let url = request.url().to_string();

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|source| SessionError::transport(url, source))?;

        debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Logs in, sends one request, logs out, and returns that request's response.
    ///
    /// Logout happens as soon as the response headers arrive, so the body is
    /// read by the caller after the server-side session is gone.
    ///
    /// # Errors
    ///
    /// Returns the first error from `login`, `request` or `logout`. A failing
    /// inner request skips the logout.
    #[instrument(skip(self, options), fields(base_url = %self.base_url))]
    pub async fn request_once(
        &mut self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, SessionError> {
        self.login().await?;
        let response = self.request(path, options).await?;
        self.logout().await?;
        Ok(response)
    }

    fn url_string(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> Result<Request, SessionError> {
        let raw_url = self.url_string(path);
        let url = Url::parse(&raw_url).map_err(|_| SessionError::invalid_url(raw_url.clone()))?;

        let (method, headers, body) = options.into_parts();
        let mut builder = self.transport.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = body.apply(builder);
        }
        let mut request = builder
            .build()
            .map_err(|source| SessionError::transport(raw_url, source))?;

        let (cookie, token) = match &self.session {
            SessionState::Authenticated(artifacts) => {
                (artifacts.cookie.as_str(), artifacts.token.as_str())
            }
            SessionState::Unauthenticated => ("", ""),
        };
        let cookie = HeaderValue::from_str(cookie)
            .map_err(|_| SessionError::InvalidHeader { name: "Cookie" })?;
        let token = HeaderValue::from_str(token)
            .map_err(|_| SessionError::InvalidHeader { name: "X-XSRF-TOKEN" })?;

        let headers = request.headers_mut();
        headers.insert(COOKIE, cookie);
        headers.insert(HeaderName::from_static(XSRF_HEADER), token);
        Ok(request)
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Performs a one-shot login → request → logout against `config.host`.
///
/// Credentials missing from `config` are resolved from the process
/// environment. The client is dropped before returning; use
/// [`SessionClient`] directly to reuse one session for several calls.
///
/// # Errors
///
/// Same as [`SessionClient::request_once`].
pub async fn request_once(
    config: ClientConfig,
    path: &str,
    options: RequestOptions,
) -> Result<Response, SessionError> {
    SessionClient::new(config.resolve())
        .request_once(path, options)
        .await
}

/// One-shot request over an explicit transport and pre-resolved config.
///
/// # Errors
///
/// Same as [`SessionClient::request_once`].
pub async fn request_once_with(
    config: ResolvedConfig,
    transport: Arc<dyn Transport>,
    path: &str,
    options: RequestOptions,
) -> Result<Response, SessionError> {
    SessionClient::with_transport(config, transport)
        .request_once(path, options)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use reqwest::Method;
    use reqwest::header::ACCEPT;

    use super::*;
    use crate::transport::build_http_client;

    fn client_for(host: &str) -> SessionClient {
        let config = ClientConfig::new(host)
            .with_username("operator")
            .with_password("hunter2")
            .resolve_with(&HashMap::new());
        SessionClient::with_transport(config, Arc::new(build_http_client().unwrap()))
    }

    fn authenticate(client: &mut SessionClient) {
        client.session = SessionState::Authenticated(SessionArtifacts {
            cookie: "SESSION=abc; XSRF-TOKEN=tok".to_string(),
            token: "tok".to_string(),
        });
    }

    #[test]
    fn test_new_client_is_unauthenticated_with_https_base() {
        let client = client_for("http://netedit.example");
        assert!(!client.is_authenticated());
        assert_eq!(client.base_url(), "https://netedit.example");
        assert_eq!(client.username(), "operator");
    }

    #[test]
    fn test_build_request_joins_base_url_and_path() {
        let client = client_for("netedit.example:8443");
        let request = client
            .build_request("/api/devices?limit=5", RequestOptions::new())
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://netedit.example:8443/api/devices?limit=5"
        );
        assert_eq!(request.method(), &Method::GET);
    }

    #[test]
    fn test_build_request_attaches_session_headers() {
        let mut client = client_for("netedit.example");
        authenticate(&mut client);

        let request = client
            .build_request("/api/devices", RequestOptions::new())
            .unwrap();
        assert_eq!(
            request.headers().get(COOKIE).unwrap(),
            "SESSION=abc; XSRF-TOKEN=tok"
        );
        assert_eq!(request.headers().get(XSRF_HEADER).unwrap(), "tok");
    }

    #[test]
    fn test_build_request_overwrites_caller_session_headers() {
        let mut client = client_for("netedit.example");
        authenticate(&mut client);

        let options = RequestOptions::new()
            .header(COOKIE, HeaderValue::from_static("forged=1"))
            .header(
                HeaderName::from_static(XSRF_HEADER),
                HeaderValue::from_static("forged"),
            )
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        let request = client.build_request("/api/devices", options).unwrap();

        assert_eq!(request.headers().get_all(COOKIE).iter().count(), 1);
        assert_eq!(
            request.headers().get(COOKIE).unwrap(),
            "SESSION=abc; XSRF-TOKEN=tok"
        );
        assert_eq!(request.headers().get(XSRF_HEADER).unwrap(), "tok");
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_build_request_unauthenticated_sends_empty_session_headers() {
        let client = client_for("netedit.example");
        let request = client
            .build_request(LOGOUT_PATH, RequestOptions::post())
            .unwrap();

        assert_eq!(request.headers().get(COOKIE).unwrap(), "");
        assert_eq!(request.headers().get(XSRF_HEADER).unwrap(), "");
    }

    #[test]
    fn test_build_request_rejects_unparseable_url() {
        let client = client_for("bad host");
        let result = client.build_request("/login", RequestOptions::new());
        assert!(matches!(result, Err(SessionError::InvalidUrl { .. })));
    }

    #[test]
    fn test_build_request_rejects_session_cookie_with_newline() {
        let mut client = client_for("netedit.example");
        client.session = SessionState::Authenticated(SessionArtifacts {
            cookie: "SESSION=abc\nX-Injected: 1".to_string(),
            token: "tok".to_string(),
        });

        let result = client.build_request("/api/devices", RequestOptions::new());
        assert!(
            matches!(result, Err(SessionError::InvalidHeader { name: "Cookie" })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn test_build_request_rejects_session_token_with_newline() {
        let mut client = client_for("netedit.example");
        client.session = SessionState::Authenticated(SessionArtifacts {
            cookie: "SESSION=abc; XSRF-TOKEN=tok".to_string(),
            token: "tok\n".to_string(),
        });

        let result = client.build_request("/api/devices", RequestOptions::new());
        assert!(
            matches!(result, Err(SessionError::InvalidHeader { name: "X-XSRF-TOKEN" })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn test_debug_redacts_credentials_and_session() {
        let mut client = client_for("netedit.example");
        authenticate(&mut client);

        let debug_output = format!("{client:?}");
        assert!(!debug_output.contains("hunter2"), "leaked password: {debug_output}");
        assert!(!debug_output.contains("SESSION=abc"), "leaked cookie: {debug_output}");
        assert!(debug_output.contains("[REDACTED]"));
    }
}
