//! Conversions from external infrastructure errors into client errors.

use conduit_domain::ClientError;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClientError);

impl From<InfraError> for ClientError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClientError> for InfraError {
    fn from(value: ClientError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoClientError {
    fn into_client_error(self) -> ClientError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ClientError */
/* -------------------------------------------------------------------------- */

impl IntoClientError for HttpError {
    fn into_client_error(self) -> ClientError {
        if self.is_timeout() {
            return ClientError::network(format!("HTTP request timed out: {self}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return ClientError::network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ClientError::config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return ClientError::serialization(format!("failed to decode response: {self}"));
        }

        if let Some(status) = self.status() {
            return classify_status(status, self.url().map_or("", |u| u.as_str()), String::new());
        }

        if self.is_request() || self.is_body() {
            return ClientError::network(format!("HTTP request failed: {self}"));
        }

        ClientError::Permanent { status: None, message: self.to_string() }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_client_error())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP status → ClientError */
/* -------------------------------------------------------------------------- */

/// Classify a non-success response.
///
/// 5xx and 408 are transient; every other status is permanent.
pub fn classify_status(status: StatusCode, url: &str, body: String) -> ClientError {
    let message = if body.is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {body}")
    };
    let code = Some(status.as_u16());

    if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        ClientError::Transient { status: code, message }
    } else {
        ClientError::Permanent { status: code, message }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
