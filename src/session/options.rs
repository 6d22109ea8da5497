//! Caller-supplied request options.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Body, Method, RequestBuilder};
use serde::Serialize;

/// Method, headers and body for a request issued through a session.
///
/// Defaults to a bodiless `GET`. `Cookie` and `X-XSRF-TOKEN` set here are
/// always replaced by the session's own values.
#[derive(Debug, Default)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    body: Option<RequestBody>,
}

#[derive(Debug)]
pub(crate) enum RequestBody {
    Raw(Body),
    Multipart(Form),
}

impl RequestBody {
    pub(crate) fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Raw(body) => builder.body(body),
            Self::Multipart(form) => builder.multipart(form),
        }
    }
}

impl RequestOptions {
    /// Creates options for a bodiless `GET`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `RequestOptions::new().method(Method::POST)`.
    #[must_use]
    pub fn post() -> Self {
        Self::new().method(Method::POST)
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merges `headers` into the current set.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets a raw request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when `value` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(bytes))
    }

    /// Sets a `multipart/form-data` body.
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Returns the configured method.
    #[must_use]
    pub fn method_ref(&self) -> &Method {
        &self.method
    }

    pub(crate) fn into_parts(self) -> (Method, HeaderMap, Option<RequestBody>) {
        (self.method, self.headers, self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_options_are_bodiless_get() {
        let (method, headers, body) = RequestOptions::new().into_parts();
        assert_eq!(method, Method::GET);
        assert!(headers.is_empty());
        assert!(body.is_none());
    }

    #[test]
    fn test_json_sets_content_type_and_body() {
        let options = RequestOptions::post()
            .json(&json!({"name": "core-switch"}))
            .unwrap();
        assert_eq!(options.method_ref(), &Method::POST);

        let (_, headers, body) = options.into_parts();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(body.is_some());
    }

    #[test]
    fn test_header_replaces_previous_value() {
        let name = HeaderName::from_static("accept");
        let options = RequestOptions::new()
            .header(name.clone(), HeaderValue::from_static("text/plain"))
            .header(name.clone(), HeaderValue::from_static("application/json"));

        let (_, headers, _) = options.into_parts();
        assert_eq!(headers.get_all(&name).iter().count(), 1);
        assert_eq!(headers.get(&name).unwrap(), "application/json");
    }
}
