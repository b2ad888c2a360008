//! Server configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | PORT | 5050 | HTTP API port |
//! | WORK_DIR | ./data | Directory holding the embedded database |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | STRIPE_SECRET_KEY | (unset) | Payment-intent endpoint disabled when absent |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub port: u16,
    /// Working directory for the embedded database
    pub work_dir: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Payment provider secret key; payment intents are unavailable without it
    pub stripe_secret_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5050),
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }

    /// Override work dir and port; used by tests
    pub fn with_overrides(work_dir: impl Into<String>, port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.port = port;
        config
    }

    /// Path of the embedded database under the work dir
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("shop.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
