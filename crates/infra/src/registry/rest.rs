//! Typed request building over a registered HTTP client

use std::fmt;
use std::sync::Arc;

use conduit_common::SerializationPolicy;
use conduit_domain::{ClientError, Result, WireValue};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use super::options::{RequestConfigurator, RequestContext};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// HTTP client bound to one surface, base URL and serialization policy.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RestClient {
    surface: &'static str,
    http: HttpClient,
    base_url: Url,
    policy: Arc<SerializationPolicy>,
    configurator: Option<RequestConfigurator>,
}

impl RestClient {
    pub fn new(
        surface: &'static str,
        http: HttpClient,
        base_url: Url,
        policy: Arc<SerializationPolicy>,
    ) -> Self {
        Self { surface, http, base_url, policy, configurator: None }
    }

    pub fn with_configurator(mut self, configurator: Option<RequestConfigurator>) -> Self {
        self.configurator = configurator;
        self
    }

    pub fn surface(&self) -> &'static str {
        self.surface
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> &SerializationPolicy {
        &self.policy
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Resolve path segments against the base URL.
    ///
    /// The base URL is treated as a directory: `http://h/api` plus
    /// `["workflow-instances"]` yields `http://h/api/workflow-instances`.
    /// Segments are percent-encoded individually.
    pub fn resolve(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::config(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            query: Vec::new(),
            body: None,
            error: None,
        }
    }

    pub fn get(&self, segments: &[&str]) -> ApiRequest<'_> {
        self.request(Method::GET, segments)
    }

    pub fn post(&self, segments: &[&str]) -> ApiRequest<'_> {
        self.request(Method::POST, segments)
    }

    pub fn delete(&self, segments: &[&str]) -> ApiRequest<'_> {
        self.request(Method::DELETE, segments)
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("surface", &self.surface)
            .field("base_url", &self.base_url.as_str())
            .field("configured", &self.configurator.is_some())
            .finish_non_exhaustive()
    }
}

/// A request under construction.
///
/// Encoding failures are held until [`ApiRequest::send`], which reports the
/// first one without touching the network.
#[must_use = "requests do nothing until sent"]
pub struct ApiRequest<'a> {
    client: &'a RestClient,
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    error: Option<ClientError>,
}

impl ApiRequest<'_> {
    /// Append a query parameter. The name goes through the policy's naming
    /// convention and the value through its converters.
    pub fn query<T>(mut self, name: &str, value: &T) -> Self
    where
        T: Serialize + WireValue + ?Sized,
    {
        if self.error.is_none() {
            match self.client.policy.encode_token(value) {
                Ok(token) => self.query.push((self.client.policy.field_name(name), token)),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt<T>(self, name: &str, value: Option<T>) -> Self
    where
        T: Serialize + WireValue,
    {
        match value {
            Some(value) => self.query(name, &value),
            None => self,
        }
    }

    /// Set a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        if self.error.is_none() {
            match self.client.policy.encode_body(body) {
                Ok(bytes) => self.body = Some(bytes),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    /// Send the request and decode the response body.
    ///
    /// The request hook runs once on the fully built request; every retry
    /// resends that same request.
    #[instrument(
        skip_all,
        fields(surface = self.client.surface, method = %self.method, path = %self.segments.join("/"))
    )]
    pub async fn send<R: DeserializeOwned>(self, cancel: &CancellationToken) -> Result<R> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let client = self.client;
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        let mut url = client.resolve(&segments)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        let mut builder = client.http.request(self.method, url).header(ACCEPT, "application/json");
        if let Some(body) = self.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let mut request =
            builder.build().map_err(|err| ClientError::from(InfraError::from(err)))?;

        if let Some(configure) = &client.configurator {
            let context = RequestContext { surface: client.surface, base_url: &client.base_url };
            configure(&context, &mut request);
        }

        let response = client.http.execute(request, cancel).await?;
        let status = response.status();

        let bytes = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            bytes = response.bytes() => {
                bytes.map_err(|err| ClientError::from(InfraError::from(err)))?
            }
        };
        debug!(%status, len = bytes.len(), "decoding response body");

        client.policy.decode_body(&bytes)
    }
}
