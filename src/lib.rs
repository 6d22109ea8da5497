//! NetEdit Client Library
//!
//! A minimal authenticated HTTP client for the Aruba NetEdit REST API. It logs
//! in with a form, keeps the session cookie and CSRF token the server returns,
//! attaches them to later requests, and logs out again.
//!
//! # Architecture
//!
//! - [`config`] - Host and credential configuration, resolved once up front
//! - [`session`] - Session client, one-shot helper, cookie/token extraction
//! - [`transport`] - HTTP transport seam and the default reqwest client

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use config::{ClientConfig, EnvSource, ProcessEnv, ResolvedConfig};
pub use session::{RequestOptions, SessionClient, SessionError, request_once};
pub use transport::Transport;
