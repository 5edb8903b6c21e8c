//! REST API client for the Kuna exchange

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::auth::generate_auth_headers;
use super::messages::*;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::MarketDataSource;
use crate::common::types::{OrderBook, PriceLevel};
use crate::config::types::{AppSettings, Credential, KunaConfig};

/// Upper bound for a single backoff delay
const RETRY_CAP_MS: u64 = 30_000;

/// Pool of realistic browser user-agent strings, one picked per request.
/// Rotating them reduces blocking by the remote service; this is not a
/// security mechanism.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/534.24 (KHTML, like Gecko) Chrome/11.0.696.3 Safari/534.24",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko; Google Web Preview) Chrome/27.0.1453 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko; Google Web Preview) Chrome/41.0.2272.118 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/44.0.2403.157 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.101 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.24 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/69.0.3497.12 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.121 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/76.0.3809.132 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3865.120 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.87 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.92 Safari/537.36",
];

/// REST API client for the Kuna exchange
#[derive(Debug, Clone)]
pub struct KunaRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the API, without trailing slash
    base_url: String,
    /// Path prefix of the base URL, with trailing slash; part of every
    /// signed message
    sign_prefix: String,
    /// Maximum attempts per request
    max_attempts: u32,
    /// Base delay for exponential backoff between attempts
    retry_base_delay: Duration,
}

impl KunaRestClient {
    /// Create a new REST client with default timeout and retry policy
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        let sign_prefix = derive_sign_prefix(base_url)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sign_prefix,
            max_attempts: 5,
            retry_base_delay: Duration::from_millis(500),
        })
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    /// Build a client from configuration
    pub fn from_config(kuna: &KunaConfig, settings: &AppSettings) -> Result<Self> {
        let client = Self::with_timeout(
            &kuna.base_url,
            Duration::from_secs(settings.request_timeout_seconds),
        )?;
        Ok(client.with_retry_policy(
            settings.max_retry_attempts,
            Duration::from_millis(settings.retry_base_delay_ms),
        ))
    }

    // ========================================================================
    // Public Endpoints (No Authentication Required)
    // ========================================================================

    /// Get server time
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> Result<TimestampResponse> {
        self.get_public("timestamp", &[]).await
    }

    /// Get the full ticker listing, keyed by symbol
    #[instrument(skip(self))]
    pub async fn get_tickers(&self) -> Result<TickerListing> {
        self.get_public("tickers", &[]).await
    }

    /// Get recent trade history for a market
    #[instrument(skip(self))]
    pub async fn get_trades_history(&self, symbol: &str) -> Result<Vec<TradeEntry>> {
        self.get_public("trades", &[("market", symbol)]).await
    }

    /// Get the order book for a market
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, symbol: &str) -> Result<OrderBook> {
        let depth: DepthResponse = self.get_public("depth", &[("market", symbol)]).await?;
        convert_depth_response(symbol, depth)
    }

    // ========================================================================
    // Signed Endpoints (Credential Required)
    // ========================================================================

    /// Get account data for the owner of the credential pair
    #[instrument(skip(self, credential))]
    pub async fn get_user_info(&self, credential: &Credential) -> Result<UserInfo> {
        self.post_signed("auth/me", &serde_json::json!({}), credential)
            .await
    }

    /// Submit an order; a thin wrapper over the signed-request contract
    #[instrument(skip(self, credential))]
    pub async fn submit_order(
        &self,
        order: &OrderRequest,
        credential: &Credential,
    ) -> Result<serde_json::Value> {
        let body = serde_json::to_value(order)?;
        self.post_signed("auth/w/order/submit", &body, credential)
            .await
    }

    /// Cancel an order by id
    #[instrument(skip(self, credential))]
    pub async fn cancel_order(
        &self,
        order_id: i64,
        credential: &Credential,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "order_id": order_id });
        self.post_signed("order/cancel", &body, credential).await
    }

    // ========================================================================
    // Request Execution
    // ========================================================================

    /// Execute an unauthenticated GET with bounded retries
    pub async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let mut attempt = 1u32;
        loop {
            match self.try_get(path, query).await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    if let Some(failure) = self.handle_attempt_failure(path, attempt, e).await {
                        return Err(failure);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Execute a signed POST with bounded retries
    ///
    /// Nonce and signature are recomputed on every attempt; a replayed
    /// signature would be rejected by the server after a backoff delay.
    pub async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        credential: &Credential,
    ) -> Result<T> {
        let body_json = serde_json::to_string(body)?;

        let mut attempt = 1u32;
        loop {
            match self.try_post(path, &body_json, credential).await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    if let Some(failure) = self.handle_attempt_failure(path, attempt, e).await {
                        return Err(failure);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Log a failed attempt; sleep and return None when the budget allows
    /// another try, otherwise return the terminal error.
    async fn handle_attempt_failure(
        &self,
        path: &str,
        attempt: u32,
        error: ClientError,
    ) -> Option<ClientError> {
        if attempt >= self.max_attempts {
            return Some(ClientError::RetriesExhausted {
                path: path.to_string(),
                attempts: attempt,
                last_error: error.to_string(),
            });
        }

        warn!(
            "Request to {} failed on attempt #{}: {}. Retrying.",
            path, attempt, error
        );
        tokio::time::sleep(backoff_with_jitter(self.retry_base_delay, attempt)).await;
        None
    }

    async fn try_get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("accept", "application/json")
            .header("user-agent", pick_user_agent())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn try_post<T: DeserializeOwned>(
        &self,
        path: &str,
        body_json: &str,
        credential: &Credential,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {}", url);

        let auth = generate_auth_headers(credential, &self.sign_prefix, path, body_json)?;

        let request = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .header("user-agent", pick_user_agent())
            .header("content-type", "application/json")
            .body(body_json.to_string());

        let response = auth.apply_to_request(request).send().await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketDataSource for KunaRestClient {
    async fn ticker_listing(&self) -> Result<TickerListing> {
        self.get_tickers().await
    }

    async fn recent_trades(&self, symbol: &str) -> Result<Vec<TradeEntry>> {
        self.get_trades_history(symbol).await
    }
}

/// Path component of the base URL with a trailing slash, e.g. `/v3/`
fn derive_sign_prefix(base_url: &str) -> Result<String> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| ClientError::Configuration(format!("Invalid base URL {}: {}", base_url, e)))?;
    let mut prefix = url.path().trim_end_matches('/').to_string();
    prefix.push('/');
    Ok(prefix)
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS[rand::thread_rng().gen_range(0..USER_AGENTS.len())]
}

/// Full-jitter exponential backoff: uniform over `0..=min(base << (attempt-1), cap)`
fn backoff_with_jitter(base: Duration, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(63);
    let multiplier = 1u64.checked_shl(shift).unwrap_or(u64::MAX);
    let exp = (base.as_millis() as u64)
        .saturating_mul(multiplier)
        .min(RETRY_CAP_MS);
    Duration::from_millis(rand::thread_rng().gen_range(0..=exp))
}

/// Convert a depth response into the domain order book, parsing decimal strings
fn convert_depth_response(symbol: &str, depth: DepthResponse) -> Result<OrderBook> {
    fn parse_levels(levels: Vec<(String, String)>, side: &str) -> Result<Vec<PriceLevel>> {
        levels
            .into_iter()
            .map(|(price, volume)| {
                Ok(PriceLevel {
                    price: price.parse().map_err(|e| {
                        ClientError::InvalidResponse(format!("Invalid {} price: {}", side, e))
                    })?,
                    volume: volume.parse().map_err(|e| {
                        ClientError::InvalidResponse(format!("Invalid {} volume: {}", side, e))
                    })?,
                })
            })
            .collect()
    }

    Ok(OrderBook {
        symbol: symbol.to_string(),
        bids: parse_levels(depth.bids, "bid")?,
        asks: parse_levels(depth.asks, "ask")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = KunaRestClient::new("https://kuna.io/api/v2");
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_normalization() {
        let client = KunaRestClient::new("https://kuna.io/api/v2/").unwrap();
        assert!(!client.base_url.ends_with('/'));
        assert_eq!(client.sign_prefix, "/api/v2/");
    }

    #[test]
    fn test_sign_prefix_without_path() {
        let client = KunaRestClient::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(client.sign_prefix, "/");
    }

    #[test]
    fn test_backoff_is_bounded() {
        let base = Duration::from_millis(500);
        for attempt in 1..=20 {
            let delay = backoff_with_jitter(base, attempt);
            assert!(delay <= Duration::from_millis(RETRY_CAP_MS));
        }
    }

    #[test]
    fn test_backoff_first_attempt_within_base() {
        let base = Duration::from_millis(100);
        for _ in 0..50 {
            assert!(backoff_with_jitter(base, 1) <= base);
        }
    }

    #[test]
    fn test_user_agent_comes_from_pool() {
        for _ in 0..50 {
            assert!(USER_AGENTS.contains(&pick_user_agent()));
        }
    }

    #[test]
    fn test_convert_depth_response() {
        let depth = DepthResponse {
            timestamp: Some(1588000000),
            bids: vec![("250000.0".to_string(), "0.5".to_string())],
            asks: vec![("251000.0".to_string(), "0.2".to_string())],
        };

        let book = convert_depth_response("btcuah", depth).unwrap();
        assert_eq!(book.symbol, "btcuah");
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.asks.len(), 1);
    }

    #[test]
    fn test_convert_depth_response_rejects_garbage() {
        let depth = DepthResponse {
            timestamp: None,
            bids: vec![("not-a-number".to_string(), "0.5".to_string())],
            asks: vec![],
        };

        assert!(convert_depth_response("btcuah", depth).is_err());
    }
}
