use serde::{Deserialize, Serialize};
use crate::config::tax::GstConfig;
use crate::price_infra::market_status::MarketStatus;
use crate::price_infra::normalizer::NormalizedPrices;
use crate::types::metal::Metal;
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedMetal {
    pub base: Price,
    pub cgst: Price,
    pub sgst: Price,
    pub total_with_tax: Price,
}

impl PricedMetal {
    pub fn from_base(base: Price, gst: &GstConfig) -> Self {
        let cgst = base * gst.cgst_rate;
        let sgst = base * gst.sgst_rate;
        PricedMetal {
            base,
            cgst,
            sgst,
            total_with_tax: base + cgst + sgst,
        }
    }
}

/// Movement of the base price against the previously published snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub change: Price,
    pub change_percent: f64,
}

impl PriceChange {
    pub fn between(previous: Price, current: Price) -> Self {
        let change = current - previous;
        let change_percent = if previous.is_positive() {
            change.to_f64() / previous.to_f64() * 100.0
        } else {
            0.0
        };
        PriceChange { change, change_percent }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Live,
    Cached,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub sequence: u64,
    pub gold: PricedMetal,
    pub silver: PricedMetal,
    pub gold_change: PriceChange,
    pub silver_change: PriceChange,
    pub as_of: Timestamp,
    /// Most recent successful fetch. Older than `as_of` on cached snapshots.
    pub last_live_at: Option<Timestamp>,
    pub market_status: MarketStatus,
    pub source: SnapshotSource,
}

impl PriceSnapshot {
    pub fn new(
        sequence: u64,
        prices: NormalizedPrices,
        as_of: Timestamp,
        last_live_at: Option<Timestamp>,
        market_status: MarketStatus,
        source: SnapshotSource,
        previous: Option<&PriceSnapshot>,
    ) -> Self {
        let change = |metal: Metal, current: &PricedMetal| match previous {
            Some(prev) => PriceChange::between(prev.metal(metal).base, current.base),
            None => PriceChange::default(),
        };

        PriceSnapshot {
            sequence,
            gold_change: change(Metal::Gold, &prices.gold),
            silver_change: change(Metal::Silver, &prices.silver),
            gold: prices.gold,
            silver: prices.silver,
            as_of,
            last_live_at,
            market_status,
            source,
        }
    }

    pub fn metal(&self, metal: Metal) -> &PricedMetal {
        match metal {
            Metal::Gold => &self.gold,
            Metal::Silver => &self.silver,
        }
    }

    pub fn gold_per_gram(&self) -> Price {
        self.gold.base / 10.0
    }

    /// True when the numbers may not reflect a live, moving market.
    pub fn is_degraded(&self) -> bool {
        self.source == SnapshotSource::Cached || !self.market_status.is_open()
    }
}
