use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::config::market::MarketHoursConfig;
use crate::error::Result;
use crate::price_infra::RawRatePair;
use crate::types::timestamp::{elapsed_between, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    ClosedWeekend,
    /// Outside trading hours, or prices have not moved for longer than the threshold.
    ClosedInactivity,
}

impl MarketStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, MarketStatus::Open)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketStatus::Open => "open",
            MarketStatus::ClosedWeekend => "closed_weekend",
            MarketStatus::ClosedInactivity => "closed_inactivity",
        }
    }
}

/// Price movement history the feed feeds on every tick, live or cached.
#[derive(Debug, Clone, Default)]
pub struct MovementState {
    last_change_time: Option<Timestamp>,
    last_observed: Option<RawRatePair>,
    last_success_time: Option<Timestamp>,
}

impl MovementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pair` as seen at `now`. Returns true when the pair differs from the last one
    /// (the first observation counts as a change).
    pub fn observe(&mut self, pair: RawRatePair, now: Timestamp) -> bool {
        let moved = self.last_observed != Some(pair);
        if moved {
            self.last_change_time = Some(now);
        }
        self.last_observed = Some(pair);
        moved
    }

    pub fn mark_success(&mut self, now: Timestamp) {
        self.last_success_time = Some(now);
    }

    pub fn last_change_time(&self) -> Option<Timestamp> {
        self.last_change_time
    }

    pub fn last_success_time(&self) -> Option<Timestamp> {
        self.last_success_time
    }

    /// Time since prices last moved. Zero before the first observation.
    pub fn time_since_change(&self, now: Timestamp) -> Duration {
        self.last_change_time
            .map(|changed| elapsed_between(changed, now))
            .unwrap_or(Duration::ZERO)
    }
}

pub struct MarketStatusTracker {
    offset: FixedOffset,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    trading_days: Vec<Weekday>,
    weekend_days: Vec<Weekday>,
    inactivity_threshold: Duration,
}

impl MarketStatusTracker {
    pub fn new(config: &MarketHoursConfig) -> Result<Self> {
        Ok(MarketStatusTracker {
            offset: config.offset()?,
            opens_at: config.opens_at,
            closes_at: config.closes_at,
            trading_days: config.trading_days.clone(),
            weekend_days: config.weekend_days.clone(),
            inactivity_threshold: config.inactivity_threshold(),
        })
    }

    pub fn to_local(&self, now: Timestamp) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    pub fn classify(&self, now: Timestamp, movement: &MovementState) -> MarketStatus {
        let local = self.to_local(now);
        let weekday = local.weekday();

        if self.weekend_days.contains(&weekday) {
            return MarketStatus::ClosedWeekend;
        }

        if !self.trading_days.contains(&weekday) || !self.within_session(local.time()) {
            return MarketStatus::ClosedInactivity;
        }

        if movement.time_since_change(now) >= self.inactivity_threshold {
            return MarketStatus::ClosedInactivity;
        }

        MarketStatus::Open
    }

    fn within_session(&self, time: NaiveTime) -> bool {
        time >= self.opens_at && time < self.closes_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ist(day: u32, hour: u32, minute: u32) -> Timestamp {
        // March 2025: the 2nd is a Sunday, the 5th a Wednesday.
        FixedOffset::east_opt(330 * 60)
            .unwrap()
            .with_ymd_and_hms(2025, 3, day, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn tracker() -> MarketStatusTracker {
        MarketStatusTracker::new(&MarketHoursConfig::default()).unwrap()
    }

    fn pair(gold: f64) -> RawRatePair {
        RawRatePair::from_f64(gold, 265000.0).unwrap()
    }

    #[test]
    fn sunday_is_weekend_regardless_of_movement() {
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(2, 11, 59));
        assert_eq!(tracker().classify(ist(2, 12, 0), &movement), MarketStatus::ClosedWeekend);
    }

    #[test]
    fn saturday_is_weekend_by_default() {
        let movement = MovementState::new();
        assert_eq!(tracker().classify(ist(1, 12, 0), &movement), MarketStatus::ClosedWeekend);
    }

    #[test]
    fn recent_change_during_session_is_open() {
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(5, 9, 55));
        assert_eq!(tracker().classify(ist(5, 10, 0), &movement), MarketStatus::Open);
    }

    #[test]
    fn no_change_for_sixty_five_minutes_is_inactive() {
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(5, 8, 55));
        assert_eq!(tracker().classify(ist(5, 10, 0), &movement), MarketStatus::ClosedInactivity);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(5, 10, 0));
        assert_eq!(tracker().classify(ist(5, 10, 59), &movement), MarketStatus::Open);
        assert_eq!(tracker().classify(ist(5, 11, 0), &movement), MarketStatus::ClosedInactivity);
    }

    #[test]
    fn outside_session_hours_is_inactive() {
        let movement = MovementState::new();
        assert_eq!(tracker().classify(ist(5, 8, 59), &movement), MarketStatus::ClosedInactivity);
        assert_eq!(tracker().classify(ist(5, 17, 0), &movement), MarketStatus::ClosedInactivity);
        assert_eq!(tracker().classify(ist(5, 9, 0), &movement), MarketStatus::Open);
    }

    #[test]
    fn non_trading_weekday_is_inactive_not_weekend() {
        let config = MarketHoursConfig {
            trading_days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
            weekend_days: vec![Weekday::Sun],
            ..MarketHoursConfig::default()
        };
        let tracker = MarketStatusTracker::new(&config).unwrap();
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(1, 11, 55));

        assert_eq!(tracker.classify(ist(1, 12, 0), &movement), MarketStatus::ClosedInactivity);
        assert_eq!(tracker.classify(ist(2, 12, 0), &movement), MarketStatus::ClosedWeekend);
    }

    #[test]
    fn saturday_trades_once_dropped_from_weekend() {
        let config = MarketHoursConfig {
            weekend_days: vec![Weekday::Sun],
            ..MarketHoursConfig::default()
        };
        let tracker = MarketStatusTracker::new(&config).unwrap();
        let mut movement = MovementState::new();
        movement.observe(pair(159000.0), ist(1, 11, 55));

        assert_eq!(tracker.classify(ist(1, 12, 0), &movement), MarketStatus::Open);
        assert_eq!(tracker.classify(ist(1, 17, 0), &movement), MarketStatus::ClosedInactivity);
    }

    #[test]
    fn first_observation_counts_as_fresh() {
        let movement = MovementState::new();
        assert_eq!(movement.time_since_change(ist(5, 10, 0)), Duration::ZERO);
        assert_eq!(tracker().classify(ist(5, 10, 0), &movement), MarketStatus::Open);
    }

    #[test]
    fn equal_pairs_do_not_advance_change_time() {
        let mut movement = MovementState::new();
        assert!(movement.observe(pair(159000.0), ist(5, 10, 0)));
        assert!(!movement.observe(pair(159000.0), ist(5, 10, 10)));
        assert_eq!(movement.last_change_time(), Some(ist(5, 10, 0)));

        assert!(movement.observe(pair(159100.0), ist(5, 10, 20)));
        assert_eq!(movement.last_change_time(), Some(ist(5, 10, 20)));
    }

    #[test]
    fn local_conversion_uses_configured_offset() {
        let local = tracker().to_local(ist(5, 10, 0));
        assert_eq!(local.format("%H:%M").to_string(), "10:00");
        assert_eq!(local.weekday(), Weekday::Wed);
    }
}
