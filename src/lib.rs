//! KunaCollector Library
//!
//! A Rust library for talking to the Kuna exchange API and collecting
//! per-symbol trade history into a deduplicated on-disk cache.

pub mod collector;
pub mod common;
pub mod config;
pub mod kuna;

// Re-export commonly used types
pub use collector::{CycleOutcome, Poller, SymbolCache, SymbolRegistry, TradeStore};
pub use collector::calendar::calendar_seconds;
pub use common::errors::{ClientError, Result};
pub use common::traits::MarketDataSource;
pub use common::types::{OrderBook, PriceLevel, TradeRecord};
pub use config::types::{AppConfig, Credential};
pub use kuna::rest::KunaRestClient;
