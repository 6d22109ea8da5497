//! Transport that sends HTTPS session traffic to a plain-HTTP mock server.
//!
//! The session client always targets `https://<host>`. Tests keep that URL
//! on the request builder and swap the origin for the mock server's right
//! before sending.

use std::sync::Arc;

use async_trait::async_trait;
use netedit_client::transport::build_http_client;
use netedit_client::{ClientConfig, ResolvedConfig, SessionClient, Transport};
use reqwest::{Client, Method, Request, RequestBuilder, Response};
use url::Url;
use wiremock::MockServer;

pub const TEST_HOST: &str = "netedit.test";

pub struct LoopbackTransport {
    client: Client,
    origin: Url,
}

impl LoopbackTransport {
    pub fn new(origin: &str) -> Self {
        Self {
            client: build_http_client().expect("default client builds"),
            origin: Url::parse(origin).expect("mock origin is a URL"),
        }
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn execute(&self, mut request: Request) -> Result<Response, reqwest::Error> {
        let url = request.url_mut();
        url.set_scheme(self.origin.scheme())
            .expect("http and https are interchangeable");
        url.set_host(self.origin.host_str())
            .expect("mock host is valid");
        url.set_port(self.origin.port())
            .expect("mock port is valid");
        self.client.execute(request).await
    }
}

pub fn test_config() -> ResolvedConfig {
    ClientConfig::new(TEST_HOST)
        .with_username("operator")
        .with_password("hunter2")
        .resolve_with(&std::collections::HashMap::new())
}

pub fn loopback_to(server: &MockServer) -> Arc<dyn Transport> {
    Arc::new(LoopbackTransport::new(&server.uri()))
}

pub fn client_for(server: &MockServer) -> SessionClient {
    SessionClient::with_transport(test_config(), loopback_to(server))
}

/// Returns `true` when this environment lets tests open loopback sockets.
pub fn loopback_sockets_available() -> bool {
    match std::net::TcpListener::bind("127.0.0.1:0") {
        Ok(_) => true,
        Err(err) => {
            eprintln!("skipping: cannot bind a loopback socket ({err})");
            false
        }
    }
}

/// Starts a mock NetEdit server and a session client routed to it.
///
/// Returns `None` in sandboxes that forbid binding sockets, so tests can
/// return early instead of failing.
pub async fn start_session_server_or_skip() -> Option<(MockServer, SessionClient)> {
    if !loopback_sockets_available() {
        return None;
    }
    let server = MockServer::start().await;
    let client = client_for(&server);
    Some((server, client))
}
