use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voice_relay::upstream::WhisperClient;
use voice_relay::{create_router, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "voice-relay", about = "Audio transcription relay")]
struct Args {
    /// Path to a TOML config file (defaults to config/voice-relay.toml)
    #[arg(long)]
    config: Option<String>,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    let spool_dir = cfg.spool_dir();
    std::fs::create_dir_all(&spool_dir)
        .with_context(|| format!("Failed to create spool directory {}", spool_dir.display()))?;

    info!("voice-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Allowed origins: {:?}", cfg.cors.allowed_origins);
    info!("Upstream endpoint: {}", cfg.upstream.endpoint);
    info!("Spool directory: {}", spool_dir.display());

    let transcriber = Arc::new(WhisperClient::new(&cfg.upstream)?);
    let addr = format!("{}:{}", cfg.server.bind, cfg.server.port);

    let state = AppState::new(Arc::new(cfg), transcriber);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
