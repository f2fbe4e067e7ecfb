use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

/// USD to INR reference rate applied to international quotations.
pub const USD_INR_RATE: f64 = 91.01;

pub const CONFIG_PATH_ENV: &str = "QUOTE_TOOL_CONFIG";
pub const HTTP_ADDR_ENV: &str = "QUOTE_TOOL_HTTP_ADDR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Process-wide settings. Loaded once at startup and shared read-only with the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub usd_inr_rate: f64,
    pub default_overhead_factor: f64,
    pub default_margin_percent: u8,
    pub http_addr: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            usd_inr_rate: USD_INR_RATE,
            default_overhead_factor: 1.4,
            default_margin_percent: 30,
            http_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl QuoteConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: QuoteConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overlaid by the JSON file named in `QUOTE_TOOL_CONFIG` and then by
    /// `QUOTE_TOOL_HTTP_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };
        if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
            if !addr.trim().is_empty() {
                config.http_addr = addr.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.usd_inr_rate.is_finite() || self.usd_inr_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "usd_inr_rate must be a positive number (got {})",
                self.usd_inr_rate
            )));
        }
        Ok(())
    }
}
