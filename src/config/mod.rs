use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::price_infra::{ConnectionType, RawRatePair};

pub mod market;
pub mod tax;
pub mod loader;

/// Scheduling knobs. Unset values take the defaults of the configured connection.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub interval_secs: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl FeedConfig {
    pub fn interval(&self, connection: &ConnectionType) -> Duration {
        self.interval_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| connection.default_interval())
    }

    pub fn request_timeout(&self, connection: &ConnectionType) -> Duration {
        self.request_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| connection.default_timeout())
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == Some(0) {
            return Err(Error::ConfigError("feed.interval_secs must be positive".to_string()));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(Error::ConfigError("feed.request_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

/// Static prices served until the first successful fetch.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub gold_per_10g: f64,
    pub silver_per_kg: f64,
}

impl FallbackConfig {
    pub fn pair(&self) -> Result<RawRatePair> {
        RawRatePair::from_f64(self.gold_per_10g, self.silver_per_kg)
            .map_err(|e| Error::ConfigError(format!("fallback prices: {}", e)))
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        FallbackConfig {
            gold_per_10g: 159000.0,   // Gold (999) per 10 grams
            silver_per_kg: 265000.0,  // Silver (999) per kilogram
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
