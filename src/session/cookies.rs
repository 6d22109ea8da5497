//! Session artifact extraction from login responses.
//!
//! NetEdit answers a successful `POST /login` with a `Set-Cookie` header that
//! carries both the session cookie and an `XSRF-TOKEN` cookie. The client has
//! to echo every cookie pair back in a `Cookie` header and copy the token into
//! `X-XSRF-TOKEN` on each later request.

use std::borrow::Cow;

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::{debug, instrument};

/// Name of the cookie holding the CSRF token.
pub const XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Separator between cookie directives in a folded `Set-Cookie` value.
const DIRECTIVE_SEPARATOR: &str = ", ";

/// Separator between attributes inside one directive, and between pairs in a
/// `Cookie` request header.
const ATTRIBUTE_SEPARATOR: &str = "; ";

/// Returns the folded `Set-Cookie` value of a response.
///
/// Servers speaking HTTP/1.1 usually send one `Set-Cookie` line per cookie.
/// The lines are joined with `", "`, matching the single-string form the
/// extraction functions expect. Bytes outside visible ASCII (obs-text) are
/// decoded lossily so the line, and any token in it, is still seen.
///
/// Returns `None` when the response carries no `Set-Cookie` header at all.
#[must_use]
pub fn folded_set_cookie(headers: &HeaderMap) -> Option<String> {
    let lines: Vec<Cow<'_, str>> = headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| {
            let line = String::from_utf8_lossy(value.as_bytes());
            if matches!(line, Cow::Owned(_)) {
                debug!("Set-Cookie line is not valid UTF-8; decoded lossily");
            }
            line
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(DIRECTIVE_SEPARATOR))
    }
}

/// Turns a folded `Set-Cookie` value into a usable `Cookie` header value.
///
/// Each `", "`-separated directive contributes its first attribute (the
/// `name=value` pair); attributes such as `Path` or `HttpOnly` are dropped.
/// Pairs keep their original order and are joined with `"; "`.
///
/// Fragments without a `name=value` first attribute are ignored. These appear
/// when an `Expires` date, which itself contains `", "`, is split apart.
///
/// # Example
///
/// ```
/// use netedit_client::session::cookie_header_from_set_cookie;
///
/// let cookie = cookie_header_from_set_cookie("a=1; Path=/, b=2; HttpOnly");
/// assert_eq!(cookie.as_deref(), Some("a=1; b=2"));
/// ```
///
/// Returns `None` when no cookie pair could be found.
#[must_use]
#[instrument(level = "trace", skip_all)]
pub fn cookie_header_from_set_cookie(set_cookie: &str) -> Option<String> {
    let pairs: Vec<&str> = set_cookie
        .split(DIRECTIVE_SEPARATOR)
        .filter_map(|directive| directive.split(ATTRIBUTE_SEPARATOR).next())
        .map(str::trim)
        .filter(|pair| is_cookie_pair(pair))
        .collect();

    debug!(pairs = pairs.len(), "extracted cookie pairs from Set-Cookie");

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join(ATTRIBUTE_SEPARATOR))
    }
}

/// Finds the CSRF token inside a `Cookie` header value.
///
/// Returns the text after the first `=` of the `XSRF-TOKEN` pair, or `None`
/// when no such pair exists.
///
/// # Example
///
/// ```
/// use netedit_client::session::xsrf_token_from_cookie;
///
/// assert_eq!(xsrf_token_from_cookie("a=1; XSRF-TOKEN=xyz123; c=3"), Some("xyz123"));
/// assert_eq!(xsrf_token_from_cookie("a=1"), None);
/// ```
#[must_use]
pub fn xsrf_token_from_cookie(cookie: &str) -> Option<&str> {
    cookie
        .split(ATTRIBUTE_SEPARATOR)
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == XSRF_COOKIE_NAME)
        .map(|(_, value)| value)
}

fn is_cookie_pair(candidate: &str) -> bool {
    candidate
        .split_once('=')
        .is_some_and(|(name, _)| !name.is_empty() && !name.contains(char::is_whitespace))
}
