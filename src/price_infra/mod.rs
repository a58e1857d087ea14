pub mod connectors;
pub mod fallback;
pub mod normalizer;
pub mod market_status;
pub mod feed;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{Error, Result};
use crate::types::metal::Metal;
use crate::types::price::Price;

pub const IBJA_RATES_URL: &str = "https://rates.ibja.co/";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RateSourceConfig {
    pub source_id: String,
    pub connection: ConnectionType,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        RateSourceConfig {
            source_id: "ibja".to_string(),
            connection: ConnectionType::Ibja { url: IBJA_RATES_URL.to_string() },
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConnectionType {
    /// Polls the public rate endpoint directly.
    Ibja { url: String },
    /// Polls a backend that scrapes the provider on our behalf.
    Backend { url: String },
}

impl ConnectionType {
    pub fn url(&self) -> &str {
        match self {
            ConnectionType::Ibja { url } | ConnectionType::Backend { url } => url,
        }
    }

    pub fn default_interval(&self) -> Duration {
        match self {
            ConnectionType::Ibja { .. } => Duration::from_secs(10),
            ConnectionType::Backend { .. } => Duration::from_secs(300),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        match self {
            ConnectionType::Ibja { .. } => Duration::from_millis(8_000),
            ConnectionType::Backend { .. } => Duration::from_millis(10_000),
        }
    }
}

/// Gold per 10 grams and silver per kilogram, both strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawRatePair {
    gold_per_10g: Price,
    silver_per_kg: Price,
}

impl RawRatePair {
    pub fn new(gold_per_10g: Price, silver_per_kg: Price) -> Result<Self> {
        if !gold_per_10g.is_positive() {
            return Err(Error::InvalidRate { metal: Metal::Gold, value: gold_per_10g.to_f64() });
        }
        if !silver_per_kg.is_positive() {
            return Err(Error::InvalidRate { metal: Metal::Silver, value: silver_per_kg.to_f64() });
        }

        Ok(RawRatePair { gold_per_10g, silver_per_kg })
    }

    pub fn from_f64(gold_per_10g: f64, silver_per_kg: f64) -> Result<Self> {
        Self::new(Price::from_f64(gold_per_10g), Price::from_f64(silver_per_kg))
    }

    pub fn gold_per_10g(&self) -> Price {
        self.gold_per_10g
    }

    pub fn silver_per_kg(&self) -> Price {
        self.silver_per_kg
    }

    pub fn get(&self, metal: Metal) -> Price {
        match metal {
            Metal::Gold => self.gold_per_10g,
            Metal::Silver => self.silver_per_kg,
        }
    }
}
