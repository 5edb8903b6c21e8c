//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{ClientError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // Add default config file if it exists
    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with APP_ prefix
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let kuna = super::types::KunaConfig {
        api_key: std::env::var("KUNA_API_KEY").ok(),
        api_secret: std::env::var("KUNA_API_SECRET").ok(),
        base_url: std::env::var("KUNA_BASE_URL")
            .unwrap_or_else(|_| "https://kuna.io/api/v2".to_string()),
    };

    let mut collector = super::types::CollectorConfig::default();
    if let Ok(dir) = std::env::var("KUNA_DATA_DIR") {
        collector.data_dir = dir;
    }
    if let Ok(suffix) = std::env::var("KUNA_QUOTE_SUFFIX") {
        collector.quote_suffix = suffix;
    }

    Ok(AppConfig {
        kuna,
        collector,
        settings: super::types::AppSettings::default(),
    })
}
