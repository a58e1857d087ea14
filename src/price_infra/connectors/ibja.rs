use async_trait::async_trait;
use reqwest::header::ACCEPT;
use crate::price_infra::connectors::{http_client, RateSource};
use crate::price_infra::connectors::parser::parse_rates;
use crate::price_infra::RawRatePair;
use crate::error::{Error, Result};

/// Polls the IBJA rate page directly.
pub struct IbjaConnector {
    source_id: String,
    url: String,
    client: reqwest::Client,
}

impl IbjaConnector {
    pub fn new(source_id: &str, url: &str) -> Result<Self> {
        Ok(IbjaConnector {
            source_id: source_id.to_string(),
            url: url.to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl RateSource for IbjaConnector {
    async fn fetch_raw_rates(&self) -> Result<RawRatePair> {
        let response = self.client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let pair = parse_rates(&body)?;
        tracing::debug!(
            "IBJA rates: gold={} silver={}",
            pair.gold_per_10g(),
            pair.silver_per_kg()
        );
        Ok(pair)
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}
