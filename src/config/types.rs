//! Configuration types

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Kuna API configuration
    #[serde(default)]
    pub kuna: KunaConfig,
    /// Trade-history collector configuration
    #[serde(default)]
    pub collector: CollectorConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kuna: KunaConfig::default(),
            collector: CollectorConfig::default(),
            settings: AppSettings::default(),
        }
    }
}

/// Kuna platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KunaConfig {
    /// Public API key for signed requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// Private API key for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_kuna_base_url")]
    pub base_url: String,
}

impl Default for KunaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: default_kuna_base_url(),
        }
    }
}

impl KunaConfig {
    /// Build a signing credential when both halves of the key pair are set
    pub fn credential(&self) -> Option<Credential> {
        match (&self.api_key, &self.api_secret) {
            (Some(public), Some(private)) => {
                Some(Credential::new(public.clone(), private.clone()))
            }
            _ => None,
        }
    }
}

fn default_kuna_base_url() -> String {
    "https://kuna.io/api/v2".to_string()
}

/// Trade-history collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Directory holding one backing file per tracked symbol
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Target interval between cycle start times, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Quote-currency suffix a symbol must end with to be tracked
    #[serde(default = "default_quote_suffix")]
    pub quote_suffix: String,
    /// Listing artifacts that must never be tracked
    #[serde(default = "default_excluded_symbols")]
    pub excluded_symbols: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            poll_interval_seconds: default_poll_interval(),
            quote_suffix: default_quote_suffix(),
            excluded_symbols: default_excluded_symbols(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_poll_interval() -> u64 {
    60
}

fn default_quote_suffix() -> String {
    "uah".to_string()
}

fn default_excluded_symbols() -> Vec<String> {
    // "remuah" is a self-referential listing artifact, not a market
    vec!["remuah".to_string()]
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum attempts per request before surfacing a failure
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// Base delay for exponential retry backoff in milliseconds
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
            max_retry_attempts: default_max_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_retry_attempts() -> u32 {
    5
}

fn default_retry_base_delay() -> u64 {
    500
}

/// Opaque credential pair for signed requests.
///
/// Produced by an external key-management component; this crate only ever
/// feeds it into signature computation and never persists it.
#[derive(Debug, Clone)]
pub struct Credential {
    pub public: String,
    pub private: String,
}

impl Credential {
    pub fn new(public: String, private: String) -> Self {
        Self { public, private }
    }
}
