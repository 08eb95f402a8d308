//! Application configuration

use std::env;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Attempts for read operations against a transiently unavailable store
    pub store_retry_attempts: u32,
    /// Base backoff delay in milliseconds, doubled per attempt
    pub store_retry_base_ms: u64,
    /// Install the built-in demo catalog when the levels collection is empty
    pub seed_demo_catalog: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            store_retry_attempts: env::var("STORE_RETRY_ATTEMPTS")
                .ok()
                .and_then(|a| a.parse().ok())
                .unwrap_or(3),
            store_retry_base_ms: env::var("STORE_RETRY_BASE_MS")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(100),
            seed_demo_catalog: env::var("SEED_DEMO_CATALOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }
}
