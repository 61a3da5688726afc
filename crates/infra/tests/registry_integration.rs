//! Integration tests for client registration and the retry contract
//!
//! **Coverage:**
//! - Re-registration: last write wins
//! - Unregistered surface: configuration error
//! - Permanent failure: exactly one attempt
//! - Transient failures: retried, then success or the last failure
//! - Cancellation during an attempt, a body read or backoff: no further attempt
//! - Authenticated variant: header present on every attempt
//!
//! **Infrastructure:**
//! - WireMock HTTP servers
//! - `ApiRegistry` with fast backoff (millisecond base delay)

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use conduit_common::RetryPolicy;
use conduit_domain::ClientError;
use conduit_infra::{ApiRegistry, Credential};
use reqwest::header::HeaderValue;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use support::{fast_options, order_json, request_count, Order, OrdersClient};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn registering_twice_uses_the_second_configuration() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("from-first")))
        .expect(0)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/orders/o-1"))
        .and(header("x-config", "second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-1")))
        .expect(1)
        .mount(&second)
        .await;

    let mut registry = ApiRegistry::new();
    registry
        .register_api::<OrdersClient>(fast_options(&first.uri()).configure_request(|_, request| {
            request.headers_mut().insert("x-config", HeaderValue::from_static("first"));
        }))
        .unwrap();
    registry
        .register_api::<OrdersClient>(
            fast_options(&format!("{}/v2", second.uri())).configure_request(|_, request| {
                request.headers_mut().insert("x-config", HeaderValue::from_static("second"));
            }),
        )
        .unwrap();

    let orders = registry.create_client::<OrdersClient>(None).unwrap();
    let order = orders.get("o-1", &CancellationToken::new()).await.unwrap();

    assert_eq!(order, Order { order_id: "o-1".into(), line_count: 3 });
    assert_eq!(registry.descriptors().len(), 1);
    assert_eq!(request_count(&first).await, 0);
}

#[tokio::test]
async fn unregistered_surface_is_a_config_error() {
    let registry = ApiRegistry::new();

    let result = registry.create_client::<OrdersClient>(None);

    match result {
        Err(ClientError::Config(message)) => assert!(message.contains("Orders")),
        Err(other) => panic!("expected config error, got {other:?}"),
        Ok(client) => panic!("expected config error, got client for {}", client.base_url()),
    }
}

// ============================================================================
// Retry contract
// ============================================================================

#[tokio::test]
async fn permanent_failure_performs_exactly_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("orderId is malformed"))
        .expect(1)
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let result = orders.get("bad id", &CancellationToken::new()).await;

    match result {
        Err(ClientError::Permanent { status: Some(400), message }) => {
            assert!(message.contains("orderId is malformed"));
        }
        other => panic!("expected permanent error, got {other:?}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn two_transient_failures_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-7")))
        .expect(1)
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let order = orders.get("o-7", &CancellationToken::new()).await.unwrap();

    assert_eq!(order.order_id, "o-7");
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn request_timeout_status_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(408))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-8")))
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    assert_eq!(orders.get("o-8", &CancellationToken::new()).await.unwrap().order_id, "o-8");
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .expect(4)
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let result = orders.get("o-9", &CancellationToken::new()).await;

    match result {
        Err(ClientError::Transient { status: Some(502), message }) => {
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected transient error, got {other:?}"),
    }
}

#[tokio::test]
async fn registry_retry_policy_applies_when_options_do_not_set_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let mut registry =
        ApiRegistry::new().with_retry_policy(RetryPolicy::fixed(1, Duration::from_millis(5)));
    let mut options = fast_options(&server.uri());
    options.retry_policy = None;
    registry.register_api::<OrdersClient>(options).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let result = orders.get("o-10", &CancellationToken::new()).await;
    assert!(matches!(result, Err(ClientError::Transient { status: Some(500), .. })));
}

#[tokio::test]
async fn cancelling_during_backoff_stops_further_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

    let mut registry = ApiRegistry::new();
    let options = fast_options(&server.uri())
        .with_retry_policy(RetryPolicy::exponential(3, Duration::from_secs(30)));
    registry.register_api::<OrdersClient>(options).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let cancel = CancellationToken::new();
    let call = {
        let cancel = cancel.clone();
        tokio::spawn(async move { orders.get("o-11", &cancel).await })
    };

    // Wait for the first attempt to land; the call is then sleeping 60s.
    tokio::time::timeout(Duration::from_secs(5), async {
        while request_count(&server).await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("first attempt should reach the server");
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), call)
        .await
        .expect("cancellation should end the call promptly")
        .unwrap();

    assert_eq!(result.unwrap_err(), ClientError::Cancelled);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn independent_calls_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(order_json("a"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(order_json("b"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();
    let other = orders.clone();
    let cancel = CancellationToken::new();

    let started = Instant::now();
    let (a, b) = tokio::join!(orders.get("a", &cancel), other.get("b", &cancel));
    let elapsed = started.elapsed();

    assert_eq!(a.unwrap().order_id, "a");
    assert_eq!(b.unwrap().order_id, "b");
    assert!(elapsed < Duration::from_millis(350), "calls were serialized: {elapsed:?}");
}

#[tokio::test]
async fn cancelling_an_in_flight_request_returns_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(order_json("o-13"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&server.uri())).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let cancel = CancellationToken::new();
    let call = {
        let cancel = cancel.clone();
        tokio::spawn(async move { orders.get("o-13", &cancel).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    let cancelled_at = Instant::now();
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), call)
        .await
        .expect("cancellation should end the call promptly")
        .unwrap();

    assert_eq!(result.unwrap_err(), ClientError::Cancelled);
    assert!(cancelled_at.elapsed() < Duration::from_secs(1));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn cancelling_while_reading_the_body_returns_immediately() {
    // Sends the status line and headers, then stalls partway through the body.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let accepted = Arc::clone(&connections);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            accepted.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"orderId\"";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    let mut registry = ApiRegistry::new();
    registry.register_api::<OrdersClient>(fast_options(&format!("http://{addr}"))).unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let cancel = CancellationToken::new();
    let call = {
        let cancel = cancel.clone();
        tokio::spawn(async move { orders.get("o-14", &cancel).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), call)
        .await
        .expect("cancellation should end the body read promptly")
        .unwrap();

    assert_eq!(result.unwrap_err(), ClientError::Cancelled);
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Authenticated variant
// ============================================================================

#[tokio::test]
async fn authorization_header_is_sent_on_every_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "ApiKey k-123"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "ApiKey k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o-12")))
        .expect(1)
        .mount(&server)
        .await;

    let mut registry = ApiRegistry::new();
    registry
        .register_authenticated_api::<OrdersClient>(
            fast_options(&server.uri()).with_credential(Credential::api_key("k-123")),
        )
        .unwrap();
    let orders = registry.create_client::<OrdersClient>(None).unwrap();

    let order = orders.get("o-12", &CancellationToken::new()).await.unwrap();

    assert_eq!(order.order_id, "o-12");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.headers.get("authorization").is_some()));
}

#[tokio::test]
async fn authenticated_registration_without_credential_fails_fast() {
    let mut registry = ApiRegistry::new();

    let result = registry.register_authenticated_api::<OrdersClient>(fast_options("http://localhost:1"));

    assert!(matches!(result, Err(ClientError::Config(_))));
    assert!(!registry.is_registered::<OrdersClient>());
}
