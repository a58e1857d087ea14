use crate::price_infra::RawRatePair;

/// Last prices the upstream confirmed, or the configured defaults before any success.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    defaults: RawRatePair,
    last_known: Option<RawRatePair>,
}

impl FallbackStore {
    pub fn new(defaults: RawRatePair) -> Self {
        FallbackStore {
            defaults,
            last_known: None,
        }
    }

    pub fn get_fallback(&self) -> RawRatePair {
        self.last_known.unwrap_or(self.defaults)
    }

    /// Overwrites both metals. Only called with pairs that passed validation.
    pub fn record(&mut self, pair: RawRatePair) {
        self.last_known = Some(pair);
    }

    pub fn has_observation(&self) -> bool {
        self.last_known.is_some()
    }
}
