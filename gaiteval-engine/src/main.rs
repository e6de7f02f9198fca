//! gaiteval-engine - Gait Metric Evaluation service
//!
//! Serves classified per-session reports, longitudinal trend series,
//! and coaching recommendations over HTTP, evaluating raw measurements
//! fetched from the session listing and result-set storage
//! collaborators.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gaiteval_common::config::EngineConfig;
use gaiteval_engine::services::HttpSessionSource;
use gaiteval_engine::AppState;

#[derive(Debug, Parser)]
#[command(name = "gaiteval-engine", version, about = "Gait metric evaluation service")]
struct Args {
    /// Path to a TOML config file (overrides GAITEVAL_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config file and environment)
    #[arg(long)]
    bind_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting gaiteval-engine (Gait Metric Evaluation)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    info!("Session API: {}", config.session_api_base);
    info!("Result-set storage: {}", config.storage_base);
    info!("Fetch concurrency: {}", config.fetch_concurrency);

    let source = HttpSessionSource::new(&config.session_api_base, &config.storage_base)?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, source);
    info!(
        "Metric catalogue: {} metrics, {} slots",
        state.registry.entries().count(),
        state.catalogue_slots()
    );

    let app = gaiteval_engine::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
