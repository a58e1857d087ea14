use serde::{Deserialize, Serialize};
use crate::config::tax::GstConfig;
use crate::events::price::PricedMetal;
use crate::price_infra::RawRatePair;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPrices {
    pub gold: PricedMetal,
    pub silver: PricedMetal,
}

/// Applies CGST and SGST to a raw pair. Rates are fixed for the lifetime of the instance.
#[derive(Clone, Copy, Debug)]
pub struct PriceNormalizer {
    gst: GstConfig,
}

impl PriceNormalizer {
    pub fn new(gst: GstConfig) -> Self {
        PriceNormalizer { gst }
    }

    pub fn normalize(&self, pair: RawRatePair) -> NormalizedPrices {
        NormalizedPrices {
            gold: PricedMetal::from_base(pair.gold_per_10g(), &self.gst),
            silver: PricedMetal::from_base(pair.silver_per_kg(), &self.gst),
        }
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        PriceNormalizer::new(GstConfig::default())
    }
}

/// Normalizes with the statutory 1.5% + 1.5% split.
pub fn normalize(pair: RawRatePair) -> NormalizedPrices {
    PriceNormalizer::default().normalize(pair)
}
