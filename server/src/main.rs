use std::net::SocketAddr;

use genai_core::{GenAiConfig, Studio};
use server::{build_app, config::ServerConfig, with_rate_limit, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting creative studio server...");

    let genai_config = GenAiConfig::from_env();
    if genai_config.api_key.is_none() {
        warn!("GEMINI_API_KEY not set; generation endpoints will answer 503");
    }
    let studio = Studio::from_config(&genai_config)?;

    // Load configuration from environment
    let config = ServerConfig::from_env();
    info!(
        "Server configuration loaded: port={}, rate_limit={}/min, timeout={}s, max_upload={} bytes",
        config.port,
        config.rate_limit_per_minute,
        config.request_timeout_secs,
        config.max_upload_bytes
    );

    info!("Rate limiting: {} requests per minute", config.rate_limit_per_minute);

    let port = config.port;
    let app = with_rate_limit(build_app(AppState::new(studio, config.clone())), &config)?;

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
