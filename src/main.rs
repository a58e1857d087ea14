use std::sync::Arc;
use anyhow::Context;
use tokio::sync::watch;
use bullion_feed::api::rest::{create_router, ApiState};
use bullion_feed::config::loader::AppConfig;
use bullion_feed::observability::metrics::register_metrics;
use bullion_feed::observability::tracing::init_tracing;
use bullion_feed::price_infra::connectors::build_source;
use bullion_feed::price_infra::feed::PriceFeed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("BULLION_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(&config.log)?;
    register_metrics().context("registering metrics")?;
    tracing::info!("Starting bullion feed (env={})", env);

    let source = build_source(&config.source)?;
    let feed = Arc::new(PriceFeed::new(source, &config)?);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let feed_task = {
        let feed = feed.clone();
        let mut stop = shutdown_tx.subscribe();
        tokio::spawn(async move {
            feed.run(async move {
                let _ = stop.wait_for(|stopped| *stopped).await;
            }).await;
        })
    };

    let listener = tokio::net::TcpListener::bind(&config.api.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.api.bind_addr))?;
    tracing::info!("Serving prices on {}", config.api.bind_addr);

    let app = create_router(Arc::new(ApiState { feed }));
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
    });

    // main keeps its own handle, so a failed signal listener does not close the channel.
    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => {
                    tracing::error!("Failed to listen for shutdown signal: {}", e);
                }
            }
        }
    });

    server.await.context("serving REST API")?;
    let _ = shutdown_tx.send(true);
    feed_task.await.context("joining feed task")?;
    tracing::info!("Bullion feed stopped");
    Ok(())
}
