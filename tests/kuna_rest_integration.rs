//! Integration tests for the Kuna REST client
//!
//! All traffic goes against a local wiremock server; no real exchange
//! calls are made. These tests pin the request contract (headers, query
//! parameters, signing) and the bounded retry behavior.

mod common;

use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::api_responses;
use kuna_collector::common::errors::ClientError;
use kuna_collector::config::types::Credential;
use kuna_collector::kuna::rest::KunaRestClient;

/// Client with fast retries for test purposes
fn test_client(server: &MockServer, max_attempts: u32) -> KunaRestClient {
    KunaRestClient::with_timeout(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create REST client")
        .with_retry_policy(max_attempts, Duration::from_millis(1))
}

fn test_credential() -> Credential {
    Credential::new("public_key".to_string(), "private_key".to_string())
}

// ============================================================================
// Public Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_get_server_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timestamp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(api_responses::TIMESTAMP, "application/json"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let response = client.get_server_time().await.unwrap();

    assert_eq!(response.timestamp, 1588000000);
    assert_eq!(response.timestamp_miliseconds, Some(1588000000123));
}

#[tokio::test]
async fn test_get_trades_history_parses_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("market", "btcuah"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(api_responses::TRADES_BTCUAH, "application/json"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let trades = client.get_trades_history("btcuah").await.unwrap();

    assert_eq!(trades.len(), 3);
    assert_eq!(trades[0].id, 5);
    assert_eq!(trades[2].created_at, "2020-01-23T00:00:00Z");
}

#[tokio::test]
async fn test_public_request_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers"))
        .and(header("accept", "application/json"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(api_responses::TICKERS, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let listing = client.get_tickers().await.unwrap();

    assert_eq!(listing.len(), 4);
    assert!(listing.contains_key("btcuah"));
}

// ============================================================================
// Signed Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_signed_request_carries_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/me"))
        .and(header("content-type", "application/json"))
        .and(header("kun-apikey", "public_key"))
        .and(header_exists("kun-nonce"))
        .and(header_exists("kun-signature"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(api_responses::USER_INFO, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let info = client.get_user_info(&test_credential()).await.unwrap();

    assert_eq!(info.email, "trader@example.com");
    assert_eq!(info.activated, Some(true));
}

#[tokio::test]
async fn test_unauthorized_signed_request_surfaces_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let result = client.get_user_info(&test_credential()).await;

    match result {
        Err(ClientError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
}

// ============================================================================
// Retry Behavior Tests
// ============================================================================

#[tokio::test]
async fn test_transient_failure_is_retried_until_success() {
    let server = MockServer::start().await;

    // Two failures, then the real payload
    Mock::given(method("GET"))
        .and(path("/timestamp"))
        .respond_with(ResponseTemplate::new(500).set_body_string("try later"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/timestamp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(api_responses::TIMESTAMP, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 5);
    let response = client.get_server_time().await.unwrap();
    assert_eq!(response.timestamp, 1588000000);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timestamp"))
        .respond_with(ResponseTemplate::new(500).set_body_string("still broken"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let result = client.get_server_time().await;

    match result {
        Err(ClientError::RetriesExhausted {
            path,
            attempts,
            last_error,
        }) => {
            assert_eq!(path, "timestamp");
            assert_eq!(attempts, 3);
            assert!(last_error.contains("500"));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_an_error_not_a_panic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let result = client.get_tickers().await;
    assert!(matches!(
        result,
        Err(ClientError::RetriesExhausted { .. })
    ));
}
