use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use nuts_api::AppStateInner;
use nuts_client::{SearchClient, SearchConfig};
use nuts_core::{CHECK_INTERVAL, run_reset_loop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nuts=debug,nuts_api=debug,nuts_client=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let search = SearchConfig::from_env()?;
    let host = std::env::var("NUTS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("NUTS_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    info!(
        "Searching channel '{}' via {}",
        search.channel_id, search.base_url
    );

    // Shared state
    let client = SearchClient::new(search)?;
    let state = Arc::new(AppStateInner::new(client, Utc::now()));
    info!("Allowance ceiling {}, next reset at {}", state.ceiling(), state.clock.lock().reset_at());

    // Background allowance check (runs every minute)
    tokio::spawn(run_reset_loop(state.clock.clone(), CHECK_INTERVAL, |ceiling| {
        info!("Allowance reset, ceiling back to {}", ceiling);
    }));

    let app = nuts_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Peanut stats server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
                return;
            }
            Err(e) => warn!("Failed to install SIGTERM handler: {}", e),
        }
    }
    let _ = ctrl_c.await;
    info!("Received Ctrl+C, shutting down...");
}
