//! HTTP client adapter backed by reqwest.
//!
//! Implements the `HttpClient` port for live requests. The 30-second
//! budget is owned by the use case racing this call, not configured here;
//! dropping the returned future aborts the underlying I/O.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use reqwest::{Client, Method, Url};

use cove_application::ports::{HttpClient, HttpClientError};
use cove_domain::{HttpMethod, ResolvedRequest, ResponseRecord};

/// reqwest-backed implementation of the `HttpClient` port.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a client with the playground's transport defaults
    /// (rustls, up to 10 redirects).
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying client cannot be built.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("cove/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an externally configured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_connect() {
            return HttpClientError::Transport(format!("Connection failed: {error}"));
        }
        if error.is_redirect() {
            return HttpClientError::Transport("Too many redirects".to_string());
        }
        HttpClientError::Transport(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseRecord, HttpClientError>> + Send + '_>> {
        let method = Self::to_reqwest_method(request.method);
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();

        Box::pin(async move {
            let parsed =
                Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

            let start = Instant::now();
            let mut builder = self.client.request(method, parsed);

            for header in headers.iter() {
                builder = builder.header(header.name.as_str(), header.value.as_str());
            }

            if let Some(body) = body {
                // an explicit Content-Type wins, whatever its casing
                if !headers.contains_ignore_case("content-type") {
                    builder = builder.header("Content-Type", "application/json");
                }
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

            let status = response.status().as_u16();
            let response_headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let text = response
                .text()
                .await
                .map_err(|e| HttpClientError::Transport(format!("Failed to read body: {e}")))?;

            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            tracing::debug!(status, elapsed_ms, "response received");

            Ok(ResponseRecord::new(status, response_headers, text, elapsed_ms))
        })
    }
}
