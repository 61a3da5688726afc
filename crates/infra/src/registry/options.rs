//! Per-registration client options

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use conduit_common::RetryPolicy;
use conduit_domain::constants::{API_KEY_SCHEME, BEARER_SCHEME, DEFAULT_TIMEOUT_SECS};
use conduit_domain::{ClientError, ClientSettings, Result};
use reqwest::header::HeaderValue;
use reqwest::Request;
use url::Url;

/// Secret used to build the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: ApiKey <secret>`
    ApiKey(String),
    /// `Authorization: Bearer <secret>`
    Bearer(String),
}

impl Credential {
    pub fn api_key(secret: impl Into<String>) -> Self {
        Self::ApiKey(secret.into())
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Authorization scheme name.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => API_KEY_SCHEME,
            Self::Bearer(_) => BEARER_SCHEME,
        }
    }

    /// Rendered header value, marked sensitive.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the secret is empty or contains
    /// characters that cannot appear in a header.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let secret = match self {
            Self::ApiKey(secret) | Self::Bearer(secret) => secret,
        };
        if secret.trim().is_empty() {
            return Err(ClientError::config(format!("{} credential is empty", self.scheme())));
        }

        let mut value = HeaderValue::from_str(&format!("{} {}", self.scheme(), secret))
            .map_err(|_| {
                ClientError::config(format!(
                    "{} credential contains characters not allowed in a header",
                    self.scheme()
                ))
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// What a request hook knows about the call it is configuring
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Registered surface name
    pub surface: &'a str,
    /// Base URL the client was created with
    pub base_url: &'a Url,
}

/// Outgoing-request hook; runs once per call, before retries.
pub type RequestConfigurator = Arc<dyn Fn(&RequestContext<'_>, &mut Request) + Send + Sync>;

/// Options supplied once when a surface is registered
#[derive(Clone)]
pub struct ClientOptions {
    pub base_url: Url,
    pub credential: Option<Credential>,
    pub configure_request: Option<RequestConfigurator>,
    /// Per-attempt timeout
    pub timeout: Duration,
    pub user_agent: Option<String>,
    /// Overrides the registry's retry policy for this surface
    pub retry_policy: Option<RetryPolicy>,
}

impl ClientOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            credential: None,
            configure_request: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            retry_policy: None,
        }
    }

    /// Build options from loaded settings. The API key, when present, becomes
    /// an `ApiKey` credential.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if `base_url` is not a valid URL.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ClientError::config(format!("invalid base URL {:?}: {e}", settings.base_url))
        })?;

        Ok(Self {
            base_url,
            credential: settings.api_key.clone().map(Credential::ApiKey),
            configure_request: None,
            timeout: Duration::from_secs(settings.timeout_secs),
            user_agent: settings.user_agent.clone(),
            retry_policy: Some(RetryPolicy::from(&settings.retry)),
        })
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Install the outgoing-request hook, replacing any previous one.
    pub fn configure_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext<'_>, &mut Request) + Send + Sync + 'static,
    {
        self.configure_request = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url.as_str())
            .field("credential", &self.credential)
            .field("configure_request", &self.configure_request.as_ref().map(|_| "<hook>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}
