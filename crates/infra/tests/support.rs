//! Shared fixtures for registry integration tests
//!
//! A minimal "Orders" surface keeps these tests independent of the
//! workflow-server DTOs.

use std::time::Duration;

use conduit_common::RetryPolicy;
use conduit_domain::Result;
use conduit_infra::{ApiSurface, ClientOptions, RestClient};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::MockServer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub line_count: u32,
}

pub fn order_json(order_id: &str) -> serde_json::Value {
    serde_json::json!({ "orderId": order_id, "lineCount": 3 })
}

/// Adapter for a fictional orders API
#[derive(Debug, Clone)]
pub struct OrdersClient {
    rest: RestClient,
}

impl ApiSurface for OrdersClient {
    const NAME: &'static str = "Orders";

    fn bind(rest: RestClient) -> Self {
        Self { rest }
    }
}

impl OrdersClient {
    pub fn base_url(&self) -> &Url {
        self.rest.base_url()
    }

    pub async fn get(&self, order_id: &str, cancel: &CancellationToken) -> Result<Order> {
        self.rest.get(&["orders", order_id]).send(cancel).await
    }
}

/// Options pointing at `base` with millisecond backoff.
pub fn fast_options(base: &str) -> ClientOptions {
    ClientOptions::new(Url::parse(base).expect("valid base url"))
        .with_retry_policy(RetryPolicy::exponential(3, Duration::from_millis(5)))
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}
