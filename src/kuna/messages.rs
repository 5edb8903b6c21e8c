//! Kuna-specific wire message types
//!
//! Decimal fields arrive from the exchange as strings and are parsed
//! explicitly at the conversion boundary, so a malformed value surfaces as
//! an invalid response instead of a panic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full ticker listing, keyed by symbol identifier.
///
/// The per-symbol payload is quote data the collector never reads; only the
/// keys feed the symbol registry.
pub type TickerListing = HashMap<String, serde_json::Value>;

/// One executed trade from the public trade-history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEntry {
    /// Exchange-assigned trade identifier
    pub id: i64,
    /// Execution price, decimal string
    pub price: String,
    /// Traded volume, decimal string
    pub volume: String,
    /// Total funds exchanged, decimal string
    pub funds: String,
    /// UTC execution time, ISO-8601 string
    pub created_at: String,
    /// Price direction ("buy"/"sell"); occasionally absent
    #[serde(default)]
    pub trend: Option<String>,
}

/// Server time response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampResponse {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Same instant at millisecond precision, when provided
    #[serde(default)]
    pub timestamp_miliseconds: Option<i64>,
}

/// Order book response from the depth endpoint
///
/// Levels are `[price, volume]` pairs of decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthResponse {
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub bids: Vec<(String, String)>,
    #[serde(default)]
    pub asks: Vec<(String, String)>,
}

/// Account data for the owner of a credential pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    #[serde(default)]
    pub kunaid: Option<String>,
    #[serde(default)]
    pub two_factor: Option<bool>,
    #[serde(default)]
    pub activated: Option<bool>,
}

/// Body of an order submission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Market name
    pub symbol: String,
    /// "limit", "market", "market_by_quote" or "limit_stop_loss"
    #[serde(rename = "type")]
    pub order_type: String,
    /// Positive for buy, negative for sell
    pub amount: f64,
    /// Price per unit of the base currency; required for limit orders
    pub price: f64,
}
