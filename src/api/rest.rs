use axum::{
    Router,
    routing::{get, post},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::events::price::PriceSnapshot;
use crate::observability::metrics;
use crate::price_infra::feed::{PriceFeed, TickOutcome};

pub struct ApiState {
    pub feed: Arc<PriceFeed>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/prices", get(get_prices))
        .route("/prices/refresh", post(refresh_prices))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct LoadingResponse {
    status: &'static str,
}

async fn get_prices(State(state): State<Arc<ApiState>>) -> Response {
    match state.feed.current() {
        Some(snapshot) => Json(snapshot.as_ref().clone()).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(LoadingResponse { status: "loading" }),
        ).into_response(),
    }
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum RefreshResponse {
    Published { snapshot: PriceSnapshot },
    Coalesced,
}

async fn refresh_prices(State(state): State<Arc<ApiState>>) -> Json<RefreshResponse> {
    tracing::info!("Manual refresh requested");
    let response = match state.feed.refresh().await {
        TickOutcome::Published(snapshot) => RefreshResponse::Published {
            snapshot: snapshot.as_ref().clone(),
        },
        TickOutcome::Coalesced => RefreshResponse::Coalesced,
    };
    Json(response)
}

async fn get_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
