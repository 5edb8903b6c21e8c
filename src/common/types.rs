//! Domain types shared across the client and collector

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single executed trade, normalized for storage.
///
/// `time` is measured in whole seconds since the reference epoch
/// 2020-01-01T00:00:00Z (see [`crate::collector::calendar::calendar_seconds`]).
/// Records are immutable once created and unique by `id` within a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Exchange-assigned trade identifier
    pub id: i64,
    /// Execution price in the quote currency
    pub price: Decimal,
    /// Traded volume in the base currency
    pub volume: Decimal,
    /// Total funds exchanged (price * volume) in the quote currency
    pub funds: Decimal,
    /// Seconds since the reference epoch
    pub time: i64,
    /// Price direction reported by the exchange ("buy"/"sell")
    pub trend: String,
}

/// A single price level in an order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level
    pub price: Decimal,
    /// Total volume offered at this price
    pub volume: Decimal,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }
}

/// Order book snapshot for a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Market/symbol identifier
    pub symbol: String,
    /// Bid (buy) orders sorted by price descending
    pub bids: Vec<PriceLevel>,
    /// Ask (sell) orders sorted by price ascending
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Get the best bid price (highest buy order)
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Get the best ask price (lowest sell order)
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Calculate the spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}
