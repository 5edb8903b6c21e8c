//! Common test utilities and fixtures

use kuna_collector::common::types::TradeRecord;
use rust_decimal_macros::dec;

/// Create a sample trade record for testing
pub fn sample_record() -> TradeRecord {
    TradeRecord {
        id: 123456,
        price: dec!(250000.0),
        volume: dec!(0.05),
        funds: dec!(12500.0),
        time: 10_454_445,
        trend: "buy".to_string(),
    }
}

/// Sample API responses for testing
pub mod api_responses {
    /// Ticker listing including a foreign-quote symbol and the
    /// self-referential listing artifact
    pub const TICKERS: &str = r#"{
        "btcuah": {"at": 1900800, "ticker": {"buy": "250000.0", "sell": "251000.0"}},
        "ethuah": {"at": 1900800, "ticker": {"buy": "5000.0", "sell": "5010.0"}},
        "btcusd": {"at": 1900800, "ticker": {"buy": "9000.0", "sell": "9010.0"}},
        "remuah": {"at": 1900800, "ticker": {"buy": "1.0", "sell": "1.0"}}
    }"#;

    /// Three btcuah trades; two fall outside the three-week retention
    /// window relative to the third
    pub const TRADES_BTCUAH: &str = r#"[
        {
            "id": 5,
            "price": "240000.0",
            "volume": "0.01",
            "funds": "2400.0",
            "market": "btcuah",
            "created_at": "2020-01-01T00:01:40Z",
            "trend": "buy"
        },
        {
            "id": 6,
            "price": "240500.0",
            "volume": "0.02",
            "funds": "4810.0",
            "market": "btcuah",
            "created_at": "2020-01-01T00:03:20Z",
            "trend": "sell"
        },
        {
            "id": 7,
            "price": "250000.0",
            "volume": "0.05",
            "funds": "12500.0",
            "market": "btcuah",
            "created_at": "2020-01-23T00:00:00Z",
            "trend": "buy"
        }
    ]"#;

    /// Server time response
    pub const TIMESTAMP: &str = r#"{
        "timestamp": 1588000000,
        "timestamp_miliseconds": 1588000000123
    }"#;

    /// Account data for a signed auth/me call
    pub const USER_INFO: &str = r#"{
        "email": "trader@example.com",
        "kunaid": "kuna_id_0001",
        "two_factor": true,
        "activated": true
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_record() {
        let record = sample_record();
        assert_eq!(record.id, 123456);
        assert_eq!(record.trend, "buy");
    }

    #[test]
    fn test_fixture_bodies_are_valid_json() {
        for body in [
            api_responses::TICKERS,
            api_responses::TRADES_BTCUAH,
            api_responses::TIMESTAMP,
            api_responses::USER_INFO,
        ] {
            serde_json::from_str::<serde_json::Value>(body).unwrap();
        }
    }
}
