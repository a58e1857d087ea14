pub mod parser;
pub mod ibja;
pub mod backend;

use std::sync::Arc;
use async_trait::async_trait;
use crate::price_infra::{ConnectionType, RateSourceConfig, RawRatePair};
use crate::error::{Error, Result};

/// One fetch against an upstream rate provider. Implementations hold no state between calls.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_raw_rates(&self) -> Result<RawRatePair>;
    fn source_id(&self) -> &str;
}

pub fn build_source(config: &RateSourceConfig) -> Result<Arc<dyn RateSource>> {
    let source: Arc<dyn RateSource> = match &config.connection {
        ConnectionType::Ibja { url } => Arc::new(ibja::IbjaConnector::new(&config.source_id, url)?),
        ConnectionType::Backend { url } => {
            Arc::new(backend::BackendConnector::new(&config.source_id, url)?)
        }
    };

    tracing::info!("Rate source configured: {} ({})", config.source_id, config.connection.url());
    Ok(source)
}

// Timeouts are enforced by the feed so every source shares the same deadline.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Transport(format!("HTTP client init failed: {}", e)))
}
