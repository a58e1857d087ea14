use crate::config::market::MarketHoursConfig;
use crate::config::tax::GstConfig;
use crate::config::*;
use crate::error::Result;
use crate::price_infra::RateSourceConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub source: RateSourceConfig,
    pub fallback: FallbackConfig,
    pub gst: GstConfig,
    pub market: MarketHoursConfig,
    pub api: ApiConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Layers `config/default`, then `config/{env}`, then `BULLION__*` environment variables.
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BULLION")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        self.fallback.pair()?;
        self.gst.validate()?;
        self.market.validate()?;
        Ok(())
    }
}
