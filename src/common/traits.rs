//! Trait definitions for exchange data sources

use async_trait::async_trait;

use super::errors::Result;
use crate::kuna::messages::{TickerListing, TradeEntry};

/// Trait for exchange market-data sources.
///
/// The collector depends on this seam rather than on the HTTP client
/// directly, so registry and poller logic can be exercised against a
/// mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the full ticker listing, keyed by symbol identifier
    async fn ticker_listing(&self) -> Result<TickerListing>;

    /// Fetch the recent trade history for one symbol
    async fn recent_trades(&self, symbol: &str) -> Result<Vec<TradeEntry>>;
}
