use async_trait::async_trait;
use serde::Deserialize;
use crate::price_infra::connectors::{http_client, RateSource};
use crate::price_infra::RawRatePair;
use crate::error::{Error, Result};
use crate::types::metal::Metal;
use crate::types::price::Price;

/// Polls a backend that scrapes IBJA and republishes the fine rates.
pub struct BackendConnector {
    source_id: String,
    url: String,
    client: reqwest::Client,
}

impl BackendConnector {
    pub fn new(source_id: &str, url: &str) -> Result<Self> {
        Ok(BackendConnector {
            source_id: source_id.to_string(),
            url: url.to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl RateSource for BackendConnector {
    async fn fetch_raw_rates(&self) -> Result<RawRatePair> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let data: BackendRatesData = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedPayload(e.to_string()))?;

        if let Some(scraped) = data.last_scraped {
            tracing::debug!("Backend rates last scraped at {}", scraped);
        }
        data.into_pair()
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendRatesData {
    gold999_per10g: Option<f64>,
    gold999_per1g: Option<f64>,
    silver999: f64,
    last_scraped: Option<i64>,
}

impl BackendRatesData {
    fn into_pair(self) -> Result<RawRatePair> {
        let gold = match (self.gold999_per10g, self.gold999_per1g) {
            (Some(per_10g), _) if per_10g > 0.0 => per_10g,
            (_, Some(per_gram)) => per_gram * 10.0,
            (Some(per_10g), None) => per_10g,
            (None, None) => return Err(Error::RateNotFound(Metal::Gold)),
        };

        RawRatePair::new(Price::from_f64(gold), Price::from_f64(self.silver999))
    }
}
