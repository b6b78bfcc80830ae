//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CATALOG_PATH` | `data/plants.csv` |
//! | `PORT` | `3000` |
//! | `OVERFLOW_POLICY` | `cascade` |

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::layout::OverflowPolicy;

pub const DEFAULT_CATALOG_PATH: &str = "data/plants.csv";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub catalog_path: PathBuf,
    pub port: u16,
    pub overflow_policy: OverflowPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            port: DEFAULT_PORT,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys fall back to defaults;
    /// set but unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ServerConfig::default();

        if let Some(path) = get("CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path.trim());
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {}", port))?;
        }
        if let Some(policy) = get("OVERFLOW_POLICY") {
            config.overflow_policy = policy.parse().context("Invalid OVERFLOW_POLICY")?;
        }

        Ok(config)
    }

    pub fn log(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  CATALOG_PATH: {}", self.catalog_path.display());
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  OVERFLOW_POLICY: {}", self.overflow_policy);
    }
}
