//! Symbol discovery from the exchange listing

use std::collections::BTreeSet;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::MarketDataSource;
use crate::config::types::CollectorConfig;

/// Derives the set of tracked symbols from the full ticker listing.
///
/// Runs once at startup; a listing failure is fatal to startup and
/// propagates to the caller. There is no periodic re-discovery of new
/// listings during a run.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    quote_suffix: String,
    excluded_symbols: Vec<String>,
}

impl SymbolRegistry {
    pub fn new(quote_suffix: String, excluded_symbols: Vec<String>) -> Self {
        Self {
            quote_suffix,
            excluded_symbols,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(
            config.quote_suffix.clone(),
            config.excluded_symbols.clone(),
        )
    }

    /// Fetch the listing and keep every symbol quoted in the configured
    /// currency, minus the denylisted listing artifacts.
    pub async fn refresh<S: MarketDataSource>(&self, source: &S) -> Result<BTreeSet<String>> {
        let listing = source.ticker_listing().await?;

        let symbols: BTreeSet<String> = listing
            .into_keys()
            .filter(|symbol| {
                symbol.ends_with(&self.quote_suffix)
                    && !self.excluded_symbols.iter().any(|e| e == symbol)
            })
            .collect();

        info!(
            "Tracking {} symbols quoted in '{}'",
            symbols.len(),
            self.quote_suffix
        );
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ClientError;
    use crate::common::traits::MockMarketDataSource;
    use crate::kuna::messages::TickerListing;

    fn listing_of(symbols: &[&str]) -> TickerListing {
        symbols
            .iter()
            .map(|s| (s.to_string(), serde_json::json!({})))
            .collect()
    }

    #[tokio::test]
    async fn test_refresh_filters_by_suffix_and_denylist() {
        let mut source = MockMarketDataSource::new();
        source.expect_ticker_listing().returning(|| {
            Ok(listing_of(&[
                "btcuah", "ethuah", "remuah", "btcusd", "uahbtc",
            ]))
        });

        let registry = SymbolRegistry::new("uah".to_string(), vec!["remuah".to_string()]);
        let symbols = registry.refresh(&source).await.unwrap();

        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            vec!["btcuah".to_string(), "ethuah".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_empty_listing() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_ticker_listing()
            .returning(|| Ok(TickerListing::new()));

        let registry = SymbolRegistry::new("uah".to_string(), vec![]);
        let symbols = registry.refresh(&source).await.unwrap();
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_propagates_listing_failure() {
        let mut source = MockMarketDataSource::new();
        source.expect_ticker_listing().returning(|| {
            Err(ClientError::RetriesExhausted {
                path: "tickers".to_string(),
                attempts: 5,
                last_error: "connection refused".to_string(),
            })
        });

        let registry = SymbolRegistry::new("uah".to_string(), vec![]);
        assert!(registry.refresh(&source).await.is_err());
    }
}
