//! News sentiment HTTP service

use clap::Parser;
use sentiment_core::{SentimentAnalyzer, SentimentConfig};
use sentiment_server::{AppState, Cli, ServerConfig, init_tracing, router};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let server_config = ServerConfig::from_env()?.with_cli(&cli);

    init_tracing(server_config.log_json);

    info!("Starting news sentiment service");

    let sentiment_config = SentimentConfig::from_env()?;
    let analyzer = SentimentAnalyzer::from_config(&sentiment_config)?;
    if analyzer.has_provider() {
        info!(model = analyzer.model(), "LLM provider ready");
    } else {
        warn!("Running without an LLM provider, keyword heuristic only");
    }

    let app = router(AppState::new(analyzer));

    let listener = TcpListener::bind(server_config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    info!("Shutdown signal received");
}
