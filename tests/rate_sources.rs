use std::time::Duration;
use bullion_feed::config::loader::AppConfig;
use bullion_feed::error::Error;
use bullion_feed::price_infra::connectors::backend::BackendConnector;
use bullion_feed::price_infra::connectors::ibja::IbjaConnector;
use bullion_feed::price_infra::connectors::{build_source, RateSource};
use bullion_feed::price_infra::{ConnectionType, RateSourceConfig};
use bullion_feed::{PriceFeed, SnapshotSource, TickOutcome};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ibja_flat_object_is_parsed() {
    let server = serve(
        "/",
        ResponseTemplate::new(200)
            .set_body_json(json!({"Gold 999 Rate": "1,60,000", "Silver 999 Rate": "2,70,000"})),
    ).await;

    let connector = IbjaConnector::new("ibja", &format!("{}/", server.uri())).unwrap();
    let pair = connector.fetch_raw_rates().await.unwrap();

    assert_eq!(pair.gold_per_10g().to_f64(), 160000.0);
    assert_eq!(pair.silver_per_kg().to_f64(), 270000.0);
    assert_eq!(connector.source_id(), "ibja");
}

#[tokio::test]
async fn ibja_record_array_is_parsed() {
    let server = serve(
        "/",
        ResponseTemplate::new(200).set_body_json(json!([
            {"RateName": "Gold 999", "Rates": "1,59,000"},
            {"RateName": "Gold 995", "Rates": "1,58,364"},
            {"RateName": "Silver 999", "Rates": "2,65,000"}
        ])),
    ).await;

    let connector = IbjaConnector::new("ibja", &format!("{}/", server.uri())).unwrap();
    let pair = connector.fetch_raw_rates().await.unwrap();

    assert_eq!(pair.gold_per_10g().to_f64(), 159000.0);
    assert_eq!(pair.silver_per_kg().to_f64(), 265000.0);
}

#[tokio::test]
async fn ibja_non_success_status_is_a_fetch_error() {
    let server = serve("/", ResponseTemplate::new(503)).await;

    let connector = IbjaConnector::new("ibja", &format!("{}/", server.uri())).unwrap();
    let err = connector.fetch_raw_rates().await.unwrap_err();

    assert!(matches!(err, Error::UpstreamStatus(503)));
}

#[tokio::test]
async fn ibja_html_page_is_a_parse_error() {
    let server = serve("/", ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;

    let connector = IbjaConnector::new("ibja", &format!("{}/", server.uri())).unwrap();
    let err = connector.fetch_raw_rates().await.unwrap_err();

    assert!(matches!(err, Error::MalformedPayload(_)));
}

#[tokio::test]
async fn backend_payload_is_parsed() {
    let server = serve(
        "/rates",
        ResponseTemplate::new(200).set_body_json(json!({
            "gold999Per1g": 15950.0,
            "gold999Per10g": 159500.0,
            "silver999": 266000.0,
            "lastScraped": 1_741_150_800_000i64
        })),
    ).await;

    let connector = BackendConnector::new("broker", &format!("{}/rates", server.uri())).unwrap();
    let pair = connector.fetch_raw_rates().await.unwrap();

    assert_eq!(pair.gold_per_10g().to_f64(), 159500.0);
    assert_eq!(pair.silver_per_kg().to_f64(), 266000.0);
}

#[tokio::test]
async fn build_source_follows_connection_type() {
    let server = serve(
        "/rates",
        ResponseTemplate::new(200)
            .set_body_json(json!({"gold999Per10g": 158000.0, "silver999": 260000.0})),
    ).await;

    let config = RateSourceConfig {
        source_id: "broker".to_string(),
        connection: ConnectionType::Backend { url: format!("{}/rates", server.uri()) },
    };
    let source = build_source(&config).unwrap();

    assert_eq!(source.source_id(), "broker");
    assert_eq!(source.fetch_raw_rates().await.unwrap().gold_per_10g().to_f64(), 158000.0);
}

#[tokio::test]
async fn slow_upstream_is_cut_off_and_cached_prices_served() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"Gold 999": "1,60,000", "Silver 999": "2,70,000"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"Gold 999": "1,99,999", "Silver 999": "2,99,999"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.source.connection = ConnectionType::Ibja { url: format!("{}/", server.uri()) };
    config.feed.request_timeout_ms = Some(200);
    let feed = PriceFeed::new(build_source(&config.source).unwrap(), &config).unwrap();

    let TickOutcome::Published(live) = feed.refresh().await else {
        panic!("first refresh should publish");
    };
    assert_eq!(live.source, SnapshotSource::Live);
    assert_eq!(live.gold.base.to_f64(), 160000.0);

    let TickOutcome::Published(cached) = feed.refresh().await else {
        panic!("second refresh should publish");
    };
    assert_eq!(cached.source, SnapshotSource::Cached);
    assert_eq!(cached.gold.base.to_f64(), 160000.0);
    assert_eq!(cached.silver.base.to_f64(), 270000.0);
    assert_eq!(cached.sequence, 2);
}
