pub mod types;
pub mod events;
pub mod price_infra;
pub mod error;
pub mod config;
pub mod observability;
pub mod api;

pub use error::{Error, Result};
pub use events::price::{PriceSnapshot, PricedMetal, SnapshotSource};
pub use price_infra::RawRatePair;
pub use price_infra::feed::{PriceFeed, TickOutcome};
pub use price_infra::market_status::MarketStatus;
