use chrono::{FixedOffset, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketHoursConfig {
    /// Offset of the exchange's local time from UTC.
    pub utc_offset_minutes: i32,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub trading_days: Vec<Weekday>,
    pub weekend_days: Vec<Weekday>,
    pub inactivity_threshold_minutes: u64,
}

impl MarketHoursConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::ConfigError(format!("market.utc_offset_minutes out of range: {}", self.utc_offset_minutes))
        })
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(self.inactivity_threshold_minutes * 60)
    }

    pub fn validate(&self) -> Result<()> {
        self.offset()?;
        if self.opens_at >= self.closes_at {
            return Err(Error::ConfigError(format!(
                "market.opens_at ({}) must be before market.closes_at ({})",
                self.opens_at, self.closes_at
            )));
        }
        if self.trading_days.is_empty() {
            return Err(Error::ConfigError("market.trading_days must not be empty".to_string()));
        }
        if self.inactivity_threshold_minutes == 0 {
            return Err(Error::ConfigError("market.inactivity_threshold_minutes must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for MarketHoursConfig {
    fn default() -> Self {
        MarketHoursConfig {
            utc_offset_minutes: 330,  // IST, +05:30
            opens_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closes_at: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            trading_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ],
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            inactivity_threshold_minutes: 60,
        }
    }
}
