//! Registry of API surfaces and their named HTTP clients

use std::collections::HashMap;
use std::sync::Arc;

use conduit_common::{RetryPolicy, SerializationPolicy};
use conduit_domain::constants::DEFAULT_USER_AGENT;
use conduit_domain::{ClientError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Request;
use tracing::{debug, info, instrument};
use url::Url;

use super::options::{ClientOptions, RequestConfigurator, RequestContext};
use super::rest::RestClient;
use super::surface::{ApiSurface, ApiSurfaceDescriptor};
use crate::http::HttpClient;

/// One surface bound to its options and transport
#[derive(Clone)]
struct Registration {
    descriptor: ApiSurfaceDescriptor,
    base_url: Url,
    http: HttpClient,
    configurator: Option<RequestConfigurator>,
}

/// Explicit registry of API surfaces, owned by the composition root.
///
/// Registration takes `&mut self` and happens at startup; afterwards the
/// registry is shared immutably and [`ApiRegistry::create_client`] can be
/// called from any task.
#[derive(Clone)]
pub struct ApiRegistry {
    serialization: Arc<SerializationPolicy>,
    retry_policy: RetryPolicy,
    registrations: HashMap<&'static str, Registration>,
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRegistry {
    /// Registry with the standard serialization and transient-HTTP retry
    /// policies.
    pub fn new() -> Self {
        Self::with_policies(SerializationPolicy::standard(), RetryPolicy::transient_http())
    }

    pub fn with_policies(serialization: SerializationPolicy, retry_policy: RetryPolicy) -> Self {
        Self { serialization: Arc::new(serialization), retry_policy, registrations: HashMap::new() }
    }

    /// Default retry policy for registrations that do not set their own.
    /// Affects only surfaces registered afterwards.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn serialization_policy(&self) -> &SerializationPolicy {
        &self.serialization
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Register (or re-register) a surface. Last write wins.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be built.
    #[instrument(skip(self, options), fields(surface = %descriptor, base_url = %options.base_url))]
    pub fn register(
        &mut self,
        descriptor: ApiSurfaceDescriptor,
        options: ClientOptions,
    ) -> Result<()> {
        let retry_policy = options.retry_policy.unwrap_or(self.retry_policy);
        let http = HttpClient::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .retry_policy(retry_policy)
            .build()?;

        let registration = Registration {
            descriptor,
            base_url: options.base_url,
            http,
            configurator: options.configure_request,
        };

        match self.registrations.insert(descriptor.name(), registration) {
            Some(_) => info!(max_retries = retry_policy.max_retries(), "replaced API registration"),
            None => info!(max_retries = retry_policy.max_retries(), "registered API surface"),
        }
        Ok(())
    }

    /// Register `S` under [`ApiSurface::NAME`].
    pub fn register_api<S: ApiSurface>(&mut self, options: ClientOptions) -> Result<()> {
        self.register(S::descriptor(), options)
    }

    /// Register a surface whose requests carry an `Authorization` header.
    ///
    /// The header is set first, then the caller's own hook runs, so the hook
    /// can still inspect or override it.
    ///
    /// # Errors
    /// Returns `ClientError::Config` when `options.credential` is missing or
    /// cannot be rendered as a header; nothing is registered in that case.
    pub fn register_authenticated(
        &mut self,
        descriptor: ApiSurfaceDescriptor,
        mut options: ClientOptions,
    ) -> Result<()> {
        let credential = options.credential.as_ref().ok_or_else(|| {
            ClientError::config(format!(
                "API surface {descriptor} requires a credential for authenticated registration"
            ))
        })?;
        let authorization = credential.header_value()?;
        debug!(surface = %descriptor, scheme = credential.scheme(), "injecting authorization header");

        let inner = options.configure_request.take();
        let hook: RequestConfigurator =
            Arc::new(move |context: &RequestContext<'_>, request: &mut Request| {
                request.headers_mut().insert(AUTHORIZATION, authorization.clone());
                if let Some(inner) = &inner {
                    inner(context, request);
                }
            });
        options.configure_request = Some(hook);

        self.register(descriptor, options)
    }

    /// Authenticated variant of [`ApiRegistry::register_api`].
    pub fn register_authenticated_api<S: ApiSurface>(&mut self, options: ClientOptions) -> Result<()> {
        self.register_authenticated(S::descriptor(), options)
    }

    /// Instantiate the adapter for `S`, optionally overriding the registered
    /// base URL.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if `S` has not been registered.
    pub fn create_client<S: ApiSurface>(&self, base_url_override: Option<Url>) -> Result<S> {
        let registration = self.registrations.get(S::NAME).ok_or_else(|| {
            ClientError::config(format!("API surface {} is not registered", S::NAME))
        })?;

        let base_url = base_url_override.unwrap_or_else(|| registration.base_url.clone());
        debug!(surface = S::NAME, %base_url, "creating API client");

        let client = RestClient::new(
            registration.descriptor.name(),
            registration.http.clone(),
            base_url,
            Arc::clone(&self.serialization),
        )
        .with_configurator(registration.configurator.clone());
        Ok(S::bind(client))
    }

    /// Bind `S` over an explicitly supplied transport, bypassing
    /// registration. No request hook is installed.
    pub fn create_client_with<S: ApiSurface>(&self, http: HttpClient, base_url: Url) -> S {
        S::bind(RestClient::new(S::NAME, http, base_url, Arc::clone(&self.serialization)))
    }

    pub fn is_registered<S: ApiSurface>(&self) -> bool {
        self.registrations.contains_key(S::NAME)
    }

    /// Registered surfaces, sorted by name.
    pub fn descriptors(&self) -> Vec<ApiSurfaceDescriptor> {
        let mut descriptors: Vec<_> =
            self.registrations.values().map(|registration| registration.descriptor).collect();
        descriptors.sort();
        descriptors
    }
}
