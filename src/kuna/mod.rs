//! Kuna module - client implementation for the Kuna exchange API

pub mod auth;
pub mod messages;
pub mod rest;

pub use rest::KunaRestClient;
