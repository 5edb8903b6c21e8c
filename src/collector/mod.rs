//! Collector module - trade-history ingestion, caching and persistence

pub mod cache;
pub mod calendar;
pub mod poller;
pub mod registry;
pub mod store;

pub use cache::{SymbolCache, RETENTION_WINDOW, SECONDS_IN_A_WEEK};
pub use poller::{CycleOutcome, Poller};
pub use registry::SymbolRegistry;
pub use store::TradeStore;
