//! Periodic fetch → fallback → movement → normalize → publish pipeline.
//!
//! Each tick walks `Idle → Fetching → (Succeeded | Failed) → Published → Idle`. Ticks are
//! serialized by the state lock: a refresh that finds the lock taken is coalesced into the
//! in-flight tick instead of starting a second fetch. Readers only ever touch the watch
//! channel, so they never wait on a fetch.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use crate::config::loader::AppConfig;
use crate::error::{Error, Result};
use crate::events::price::{PriceSnapshot, SnapshotSource};
use crate::observability::metrics::{
    FETCHES_FAILED, FETCHES_SUCCEEDED, FETCH_LATENCY, GOLD_BASE_PRICE, MARKET_OPEN,
    REFRESHES_COALESCED, SILVER_BASE_PRICE, SNAPSHOTS_PUBLISHED,
};
use crate::observability::tracing::{trace_fetch, trace_tick};
use crate::price_infra::connectors::RateSource;
use crate::price_infra::fallback::FallbackStore;
use crate::price_infra::market_status::{MarketStatusTracker, MovementState};
use crate::price_infra::normalizer::PriceNormalizer;
use crate::price_infra::RawRatePair;
use crate::types::timestamp::{Clock, SystemClock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FeedPhase {
    Idle = 0,
    Fetching = 1,
    Succeeded = 2,
    Failed = 3,
    Published = 4,
}

impl From<u8> for FeedPhase {
    fn from(value: u8) -> Self {
        match value {
            1 => FeedPhase::Fetching,
            2 => FeedPhase::Succeeded,
            3 => FeedPhase::Failed,
            4 => FeedPhase::Published,
            _ => FeedPhase::Idle,
        }
    }
}

#[derive(Clone, Debug)]
pub enum TickOutcome {
    Published(Arc<PriceSnapshot>),
    /// Another tick was already fetching; its snapshot answers this request.
    Coalesced,
}

/// State only a running tick may touch.
struct FeedState {
    fallback: FallbackStore,
    movement: MovementState,
    sequence: u64,
}

pub struct PriceFeed {
    source: Arc<dyn RateSource>,
    normalizer: PriceNormalizer,
    tracker: MarketStatusTracker,
    clock: Arc<dyn Clock>,
    interval: Duration,
    request_timeout: Duration,
    state: Mutex<FeedState>,
    phase: AtomicU8,
    snapshot_tx: watch::Sender<Option<Arc<PriceSnapshot>>>,
}

impl PriceFeed {
    pub fn new(source: Arc<dyn RateSource>, config: &AppConfig) -> Result<Self> {
        let connection = &config.source.connection;
        let (snapshot_tx, _) = watch::channel(None);

        Ok(PriceFeed {
            source,
            normalizer: PriceNormalizer::new(config.gst),
            tracker: MarketStatusTracker::new(&config.market)?,
            clock: Arc::new(SystemClock),
            interval: config.feed.interval(connection),
            request_timeout: config.feed.request_timeout(connection),
            state: Mutex::new(FeedState {
                fallback: FallbackStore::new(config.fallback.pair()?),
                movement: MovementState::new(),
                sequence: 0,
            }),
            phase: AtomicU8::new(FeedPhase::Idle as u8),
            snapshot_tx,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Last published snapshot, `None` until the first tick completes.
    pub fn current(&self) -> Option<Arc<PriceSnapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PriceSnapshot>>> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> FeedPhase {
        FeedPhase::from(self.phase.load(Ordering::SeqCst))
    }

    /// Runs one tick now, unless a tick is already in flight.
    pub async fn refresh(&self) -> TickOutcome {
        let Ok(mut state) = self.state.try_lock() else {
            REFRESHES_COALESCED.inc();
            tracing::debug!("Refresh coalesced into in-flight fetch");
            return TickOutcome::Coalesced;
        };

        let span = trace_tick(state.sequence + 1);
        let snapshot = self.tick(&mut state).instrument(span).await;
        TickOutcome::Published(snapshot)
    }

    /// Ticks on the configured interval until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            "Price feed started: source={} interval={:?} timeout={:?}",
            self.source.source_id(),
            self.interval,
            self.request_timeout
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Price feed stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }

    async fn tick(&self, state: &mut FeedState) -> Arc<PriceSnapshot> {
        self.transition(FeedPhase::Fetching);
        let fetched = self.fetch().instrument(trace_fetch(self.source.source_id())).await;
        let now = self.clock.now();

        let (pair, source) = match fetched {
            Ok(pair) => {
                self.transition(FeedPhase::Succeeded);
                FETCHES_SUCCEEDED.inc();
                state.fallback.record(pair);
                state.movement.mark_success(now);
                (pair, SnapshotSource::Live)
            }
            Err(e) => {
                self.transition(FeedPhase::Failed);
                FETCHES_FAILED.with_label_values(&[e.category().as_str()]).inc();
                if state.fallback.has_observation() {
                    tracing::warn!("Rate fetch failed, serving last known prices: {}", e);
                } else {
                    tracing::warn!("Rate fetch failed before any success, serving default prices: {}", e);
                }
                (state.fallback.get_fallback(), SnapshotSource::Cached)
            }
        };

        if state.movement.observe(pair, now) {
            tracing::debug!("Price movement detected at {}", now);
        }
        let market_status = self.tracker.classify(now, &state.movement);

        state.sequence += 1;
        let previous = self.current();
        let snapshot = Arc::new(PriceSnapshot::new(
            state.sequence,
            self.normalizer.normalize(pair),
            now,
            state.movement.last_success_time(),
            market_status,
            source,
            previous.as_deref(),
        ));

        self.snapshot_tx.send_replace(Some(snapshot.clone()));
        self.transition(FeedPhase::Published);

        SNAPSHOTS_PUBLISHED.inc();
        GOLD_BASE_PRICE.set(snapshot.gold.base.to_f64());
        SILVER_BASE_PRICE.set(snapshot.silver.base.to_f64());
        MARKET_OPEN.set(i64::from(market_status.is_open()));
        tracing::info!(
            "Snapshot published: gold={} silver={} status={} source={:?}",
            snapshot.gold.base,
            snapshot.silver.base,
            market_status.label(),
            source
        );

        self.transition(FeedPhase::Idle);
        snapshot
    }

    // Dropping the timed-out future discards any late response.
    async fn fetch(&self) -> Result<RawRatePair> {
        let timer = FETCH_LATENCY.start_timer();
        let result = match tokio::time::timeout(self.request_timeout, self.source.fetch_raw_rates()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.request_timeout)),
        };
        timer.observe_duration();
        result
    }

    fn transition(&self, to: FeedPhase) {
        let from = FeedPhase::from(self.phase.swap(to as u8, Ordering::SeqCst));
        tracing::trace!("Feed phase {:?} -> {:?}", from, to);
    }
}
