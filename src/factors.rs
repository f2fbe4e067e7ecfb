use crate::config::QuoteConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Margin percentages a quotation may be priced at.
pub const MARGIN_PERCENT_OPTIONS: [u8; 5] = [10, 20, 30, 40, 50];

pub const MIN_OVERHEAD_FACTOR: f64 = 1.0;
pub const MAX_OVERHEAD_FACTOR: f64 = 2.0;

/// Market segment of the client. Drives currency, conversion rate and margin divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    #[default]
    Domestic,
    International,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Domestic => "domestic",
            ClientType::International => "international",
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        match self {
            ClientType::Domestic => "₹",
            ClientType::International => "$",
        }
    }

    /// Multiplier from the base (INR) compensation into the quoting currency.
    pub fn conversion_rate(&self, usd_inr_rate: f64) -> f64 {
        match self {
            ClientType::Domestic => 1.0,
            ClientType::International => 1.0 / usd_inr_rate,
        }
    }

    pub fn margin_divisor(&self) -> f64 {
        match self {
            ClientType::Domestic => 0.7,
            ClientType::International => 0.5,
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "domestic" | "ind" => Ok(ClientType::Domestic),
            "international" | "usa" => Ok(ClientType::International),
            other => Err(format!("unknown client type '{other}'")),
        }
    }
}

/// Global factors applied to every row of a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingFactors {
    pub overhead_factor: f64,
    pub margin_percent: u8,
    pub client_type: ClientType,
    pub discount_percent: u8,
}

impl Default for PricingFactors {
    fn default() -> Self {
        Self {
            overhead_factor: 1.4,
            margin_percent: 30,
            client_type: ClientType::Domestic,
            discount_percent: 0,
        }
    }
}

impl PricingFactors {
    pub fn from_config(config: &QuoteConfig) -> Self {
        Self {
            overhead_factor: config.default_overhead_factor,
            margin_percent: config.default_margin_percent,
            ..Self::default()
        }
    }

    /// `1 - margin_percent / 100`; never zero for an allowed margin percent.
    pub fn margin_factor(&self) -> f64 {
        1.0 - f64::from(self.margin_percent) / 100.0
    }

    pub fn currency_symbol(&self) -> &'static str {
        self.client_type.currency_symbol()
    }
}
