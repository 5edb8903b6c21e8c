//! Polling loop: fetch → merge → prune → persist, drift-corrected

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::cache::SymbolCache;
use super::calendar::calendar_seconds;
use super::store::TradeStore;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::MarketDataSource;
use crate::common::types::TradeRecord;
use crate::kuna::messages::TradeEntry;

/// Counters for one completed poll cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Records inserted into caches this cycle
    pub new_records: usize,
    /// Records dropped by retention pruning
    pub pruned: usize,
    /// Symbols whose backing file was rewritten
    pub persisted_symbols: usize,
    /// Symbols whose fetch failed (treated as "no new data")
    pub failed_fetches: usize,
    /// Symbols whose persist failed
    pub failed_persists: usize,
}

/// Repeatedly polls trade history for a set of symbols into per-symbol
/// caches, persisting dirty caches after each pass.
///
/// The poller owns the caches and the store exclusively; nothing else
/// mutates them. It is constructed explicitly and runs only when asked,
/// stopping cooperatively through a watch channel checked between cycles
/// (the in-flight sleep is interrupted as well).
pub struct Poller<S> {
    source: S,
    store: TradeStore,
    caches: HashMap<String, SymbolCache>,
    interval: Duration,
}

impl<S: MarketDataSource> Poller<S> {
    pub fn new(
        source: S,
        store: TradeStore,
        symbols: impl IntoIterator<Item = String>,
        interval: Duration,
    ) -> Self {
        let caches = symbols
            .into_iter()
            .map(|symbol| (symbol, SymbolCache::new()))
            .collect();

        Self {
            source,
            store,
            caches,
            interval,
        }
    }

    /// Load any existing backing files into the caches.
    ///
    /// Runs once, before the first cycle. An unreadable file is logged and
    /// treated as absent history; its symbol starts from an empty cache.
    pub fn hydrate(&mut self) {
        for (symbol, cache) in self.caches.iter_mut() {
            match self.store.hydrate(symbol) {
                Ok(records) if !records.is_empty() => {
                    info!("Read {} stored records for {}", records.len(), symbol);
                    cache.hydrate(records);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Could not read stored history for {}: {}. Starting empty.",
                        symbol, e
                    );
                }
            }
        }
    }

    /// Run until a stop signal arrives
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Polling {} symbols every {}s",
            self.caches.len(),
            self.interval.as_secs()
        );

        loop {
            let cycle_start = Instant::now();
            let outcome = self.run_cycle().await;
            info!(
                "Cycle done: {} new, {} pruned, {} persisted, {} fetch failures, {} persist failures",
                outcome.new_records,
                outcome.pruned,
                outcome.persisted_symbols,
                outcome.failed_fetches,
                outcome.failed_persists
            );

            // The next cycle starts a fixed interval after this one started,
            // so request latency inside a cycle does not accumulate drift.
            // An overrunning cycle makes the sleep clamp to zero.
            let next_start = cycle_start + self.interval;
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Stop signal received, shutting down poller");
                        return Ok(());
                    }
                    tokio::time::sleep_until(next_start).await;
                }
                _ = tokio::time::sleep_until(next_start) => {}
            }
        }
    }

    /// One fetch/merge/prune/persist pass over every tracked symbol.
    ///
    /// Failures are contained per symbol; the cycle always completes.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();
        let symbols: Vec<String> = self.caches.keys().cloned().collect();

        for symbol in &symbols {
            match self.source.recent_trades(symbol).await {
                Ok(entries) => {
                    let Some(cache) = self.caches.get_mut(symbol) else {
                        continue;
                    };
                    for entry in &entries {
                        if cache.contains(entry.id) {
                            continue;
                        }
                        match normalize_entry(entry) {
                            Ok(record) => {
                                if cache.add(record) {
                                    outcome.new_records += 1;
                                }
                            }
                            Err(e) => {
                                warn!("Skipping malformed trade {} for {}: {}", entry.id, symbol, e)
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Trade history fetch failed for {}: {}. No new data this cycle.",
                        symbol, e
                    );
                    outcome.failed_fetches += 1;
                }
            }
        }

        for symbol in &symbols {
            let Some(cache) = self.caches.get_mut(symbol) else {
                continue;
            };
            if !cache.is_dirty() {
                continue;
            }
            // Clear before persisting: a record arriving while a future
            // cycle persists re-dirties the cache instead of being lost.
            cache.clear_dirty();
            outcome.pruned += cache.prune();
            match self.store.persist(symbol, cache) {
                Ok(()) => outcome.persisted_symbols += 1,
                Err(e) => {
                    error!("Failed to persist {}: {}", symbol, e);
                    outcome.failed_persists += 1;
                }
            }
        }

        outcome
    }

    /// Cache for one symbol, if tracked
    pub fn cache(&self, symbol: &str) -> Option<&SymbolCache> {
        self.caches.get(symbol)
    }

    /// Symbols this poller tracks
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }
}

/// Normalize a wire trade entry into a storable record
fn normalize_entry(entry: &TradeEntry) -> Result<TradeRecord> {
    fn parse_decimal(name: &str, value: &str) -> Result<Decimal> {
        value
            .parse()
            .map_err(|e| ClientError::InvalidResponse(format!("Invalid {} '{}': {}", name, value, e)))
    }

    Ok(TradeRecord {
        id: entry.id,
        price: parse_decimal("price", &entry.price)?,
        volume: parse_decimal("volume", &entry.volume)?,
        funds: parse_decimal("funds", &entry.funds)?,
        time: calendar_seconds(&entry.created_at)?,
        trend: entry.trend.clone().unwrap_or_default(),
    })
}
