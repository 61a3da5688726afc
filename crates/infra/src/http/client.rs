use std::time::Duration;

use conduit_common::RetryPolicy;
use conduit_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use conduit_domain::{ClientError, Result};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::errors::{classify_status, InfraError};

/// HTTP client with built-in retry and timeout support.
///
/// Only successful responses are returned; non-success statuses are turned
/// into [`ClientError`] and retried when transient.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Build and execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder, cancel: &CancellationToken) -> Result<Response> {
        let request = builder.build().map_err(|err| ClientError::from(InfraError::from(err)))?;
        self.execute(request, cancel).await
    }

    /// Execute a fully built request with retry semantics.
    ///
    /// Every attempt sends a clone of `request`, so the body must be buffered.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request, cancel: &CancellationToken) -> Result<Response> {
        let client = &self.client;

        self.retry_policy
            .execute(cancel, move |attempt| {
                let cloned = request.try_clone();
                async move {
                    let request = cloned.ok_or_else(|| {
                        ClientError::config(
                            "request body cannot be cloned; buffer the body to enable retries",
                        )
                    })?;

                    let method = request.method().clone();
                    let url = request.url().clone();
                    debug!(attempt, %method, %url, "sending HTTP request");

                    let response = client.execute(request).await.map_err(|err| {
                        debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                        ClientError::from(InfraError::from(err))
                    })?;

                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if status.is_success() {
                        return Ok(response);
                    }

                    let body = response.text().await.unwrap_or_default();
                    Err(classify_status(status, url.as_str(), body))
                }
            })
            .await
            .map_err(ClientError::from)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry_policy: RetryPolicy,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_policy: RetryPolicy::transient_http(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| ClientError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry_policy: self.retry_policy })
    }
}
