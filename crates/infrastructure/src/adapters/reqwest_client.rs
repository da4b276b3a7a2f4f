//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Redirects are never followed: a `Location` header is part of what the
//! contract checks, not an instruction to the client.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use eavesdrop_application::ports::{HttpClient, HttpClientError};
use eavesdrop_domain::{
    request::{HttpMethod, RequestBody, RequestBodyKind, RequestSpec},
    response::ResponseSpec,
};
use reqwest::{Client, Method, Url};

const USER_AGENT: &str = concat!("eavesdrop-check/", env!("CARGO_PKG_VERSION"));

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Default configuration:
    /// - Redirects: not followed
    /// - TLS verification: enabled
    /// - User-Agent: `eavesdrop-check/<version>`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Attaches the body, sending empty XML payloads as a zero-length body.
    fn build_body(builder: reqwest::RequestBuilder, body: &RequestBody) -> reqwest::RequestBuilder {
        match &body.kind {
            RequestBodyKind::None => builder,
            RequestBodyKind::Raw { .. } => builder.body(body.content.clone()),
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            if message.to_lowercase().contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: error
                        .url()
                        .and_then(Url::host_str)
                        .unwrap_or("unknown")
                        .to_string(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::Body(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
        // Clone what we need to move into the async block
        let client = self.client.clone();
        let method = request.method;
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();
        let timeout_ms = request.timeout_ms;

        async move {
            let parsed_url =
                Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

            let start = Instant::now();

            let mut builder = client
                .request(Self::to_reqwest_method(method), parsed_url)
                .timeout(Duration::from_millis(timeout_ms));

            for header in headers.iter() {
                builder = builder.header(&header.name, &header.value);
            }

            if let Some(content_type) = body.content_type()
                && !headers.contains("content-type")
            {
                builder = builder.header("Content-Type", content_type);
            }

            builder = Self::build_body(builder, &body);

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();

            let response_headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Body(e.to_string()))?
                .to_vec();

            let duration = start.elapsed();

            Ok(ResponseSpec::new(
                status,
                response_headers,
                body_bytes,
                duration,
            ))
        }
    }
}
