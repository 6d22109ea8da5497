//! NetEdit session handling.
//!
//! This module provides the authenticated [`SessionClient`], the one-shot
//! [`request_once`] helper, and the cookie/token extraction used on login.
//!
//! # Example
//!
//! ```no_run
//! use netedit_client::session::{RequestOptions, request_once};
//! use netedit_client::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let response = request_once(
//!     ClientConfig::new("netedit.example.com"),
//!     "/actuator/info",
//!     RequestOptions::new(),
//! )
//! .await?;
//! println!("HTTP {}", response.status());
//! # Ok(())
//! # }
//! ```

mod client;
mod cookies;
mod error;
mod options;

pub use client::{
    LOGIN_PATH, LOGOUT_PATH, SessionClient, XSRF_HEADER, request_once, request_once_with,
};
pub use cookies::{
    XSRF_COOKIE_NAME, cookie_header_from_set_cookie, folded_set_cookie, xsrf_token_from_cookie,
};
pub use error::SessionError;
pub use options::RequestOptions;
