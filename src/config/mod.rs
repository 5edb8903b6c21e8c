//! Configuration module - file/env loading and typed settings

pub mod loader;
pub mod types;

pub use loader::load_config;
pub use types::{AppConfig, Credential};
