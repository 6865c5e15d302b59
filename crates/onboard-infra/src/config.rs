//! Infrastructure configuration.
//!
//! Defaults with `ONBOARD_`-prefixed environment overrides, e.g.
//! `ONBOARD_API_LATENCY_MS=0` to make the mocked backend instant.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct InfraConfig {
    /// Directory holding the blob cache database and the kv shim file.
    pub data_dir: PathBuf,
    /// Artificial latency of the mocked backend, in milliseconds.
    pub api_latency_ms: u64,
}

impl Default for InfraConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_latency_ms: 1000,
        }
    }
}

impl InfraConfig {
    /// Load defaults merged with `ONBOARD_*` environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let cfg = config::Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("api_latency_ms", defaults.api_latency_ms)?
            .add_source(config::Environment::with_prefix("ONBOARD"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn api_latency(&self) -> Duration {
        Duration::from_millis(self.api_latency_ms)
    }

    pub fn blob_db_path(&self) -> PathBuf {
        self.data_dir.join("blobs.db")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("onboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_point_into_data_dir() {
        let cfg = InfraConfig::default();
        assert_eq!(cfg.api_latency(), Duration::from_millis(1000));
        assert!(cfg.blob_db_path().ends_with("onboard/blobs.db"));
    }
}
