//! CLI argument definitions using clap derive macros.

use clap::Parser;
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};

/// Send one authenticated request to an Aruba NetEdit server.
///
/// Logs in, performs the request, logs out, and prints the response body.
/// The password is read from ARUBA_NETEDIT_PASSWORD.
#[derive(Parser, Debug)]
#[command(name = "netedit")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// NetEdit host, e.g. netedit.example.com:8443 (default: $ARUBA_NETEDIT_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Login username (default: $ARUBA_NETEDIT_USERNAME, then "admin")
    #[arg(short, long)]
    pub username: Option<String>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET", value_parser = parse_method)]
    pub method: Method,

    /// Extra request header as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// Request body sent verbatim
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Pretty-print a JSON response body
    #[arg(long)]
    pub json: bool,

    /// Request path, e.g. /actuator/info
    pub path: String,
}

fn parse_method(raw: &str) -> Result<Method, String> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method: {raw}"))
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header must look like 'Name: value', got: {raw}"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| format!("invalid header name: {}", name.trim()))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| format!("invalid value for header {name}"))?;
    Ok((name, value))
}
