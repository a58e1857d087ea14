use lazy_static::lazy_static;
use prometheus::{
    Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Fetch metrics
    pub static ref FETCHES_SUCCEEDED: IntCounter = IntCounter::new(
        "rate_fetches_succeeded_total",
        "Total number of upstream rate fetches that produced a valid pair"
    ).expect("metric definition");

    pub static ref FETCHES_FAILED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "rate_fetches_failed_total",
            "Total number of upstream rate fetches that fell back, by error category"
        ),
        &["category"]
    ).expect("metric definition");

    pub static ref FETCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "rate_fetch_latency_seconds",
            "Upstream rate fetch latency"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).expect("metric definition");

    // Snapshot metrics
    pub static ref SNAPSHOTS_PUBLISHED: IntCounter = IntCounter::new(
        "snapshots_published_total",
        "Total number of price snapshots published"
    ).expect("metric definition");

    pub static ref REFRESHES_COALESCED: IntCounter = IntCounter::new(
        "refreshes_coalesced_total",
        "Refresh requests absorbed by an in-flight fetch"
    ).expect("metric definition");

    pub static ref GOLD_BASE_PRICE: Gauge = Gauge::new(
        "gold_999_base_price_per_10g",
        "Base price of fine gold in the last snapshot"
    ).expect("metric definition");

    pub static ref SILVER_BASE_PRICE: Gauge = Gauge::new(
        "silver_999_base_price_per_kg",
        "Base price of fine silver in the last snapshot"
    ).expect("metric definition");

    pub static ref MARKET_OPEN: IntGauge = IntGauge::new(
        "market_open",
        "1 when the last snapshot classified the market as open"
    ).expect("metric definition");
}

pub fn register_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(FETCHES_SUCCEEDED.clone()))?;
    REGISTRY.register(Box::new(FETCHES_FAILED.clone()))?;
    REGISTRY.register(Box::new(FETCH_LATENCY.clone()))?;
    REGISTRY.register(Box::new(SNAPSHOTS_PUBLISHED.clone()))?;
    REGISTRY.register(Box::new(REFRESHES_COALESCED.clone()))?;
    REGISTRY.register(Box::new(GOLD_BASE_PRICE.clone()))?;
    REGISTRY.register(Box::new(SILVER_BASE_PRICE.clone()))?;
    REGISTRY.register(Box::new(MARKET_OPEN.clone()))?;
    Ok(())
}

/// Prometheus text exposition of everything in [`REGISTRY`].
pub fn render() -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!("Metrics encoding failed: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
