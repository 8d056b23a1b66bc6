use fitgo::ai::{Coach, GeminiModel};
use fitgo::{AppState, Config, LocalStorage, Timings, router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, AI features will return no results");
    }

    let storage = LocalStorage::open(&config.data_path).await;
    let model = GeminiModel::new(config.gemini_api_key.clone(), config.gemini_base_url.clone());
    let coach = Coach::new(Arc::new(model), config.model.clone());
    let state = AppState::load(storage, coach, Timings::default()).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(model = %config.model, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        return std::future::pending().await;
    }
    info!("shutting down");
}
