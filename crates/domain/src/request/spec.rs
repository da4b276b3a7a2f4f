//! Request specification type

use serde::{Deserialize, Serialize};

use super::{Header, Headers, HttpMethod, RequestBody, XML_CONTENT_TYPE};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Complete specification for an HTTP request.
///
/// The URL and body may contain `{{variable}}` placeholders; they are
/// resolved against the case scope before the request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL (may contain variable placeholders)
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl RequestSpec {
    /// Creates a request with the given method and URL and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: RequestBody::none(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Creates a GET request that asks for an XML representation.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url).with_header("Accept", XML_CONTENT_TYPE)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Creates a POST request carrying an XML payload.
    #[must_use]
    pub fn post_xml(url: impl Into<String>, xml: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
            .with_header("Accept", XML_CONTENT_TYPE)
            .with_body(RequestBody::xml(xml))
    }

    /// Creates a PUT request carrying an XML payload.
    #[must_use]
    pub fn put_xml(url: impl Into<String>, xml: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
            .with_header("Accept", XML_CONTENT_TYPE)
            .with_body(RequestBody::xml(xml))
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Sets the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
