use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use armory_core::{
    load_config, validate_config, ApexSource, Config, Cs2Source, DotaSource, FetchOrchestrator,
    FortniteSource, PubgSource, RivalsSource, SourceAdapter, SourceConfig, ValorantSource,
};

use armory_server::api::create_router;
use armory_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ARMORY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(version = VERSION, "Configuration loaded successfully");
    info!("Configured sources: {:?}", config.sources.enabled_names());

    // Build source adapters
    let sources = build_sources(&config);
    if sources.is_empty() {
        warn!("No sources registered; the catalog will stay empty until configured");
    }

    // Create the fetch orchestrator
    let orchestrator = Arc::new(FetchOrchestrator::new(sources));

    // Warm the catalog in the background; the API serves the empty snapshot
    // until the first pass settles.
    if !orchestrator.source_names().is_empty() {
        let warmup = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            info!("Starting initial catalog refresh");
            match warmup.refresh().await {
                Ok(outcome) => info!(
                    items = outcome.total_items,
                    complete = outcome.complete,
                    "Initial catalog refresh settled"
                ),
                Err(e) => warn!("Initial catalog refresh failed: {}", e),
            }
        });
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), orchestrator));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Build the source adapters declared in configuration.
fn build_sources(config: &Config) -> Vec<Arc<dyn SourceAdapter>> {
    let mut sources: Vec<Arc<dyn SourceAdapter>> = Vec::new();
    let declared = &config.sources;

    if let Some(cfg) = enabled(&declared.valorant) {
        info!("Registering Valorant source");
        sources.push(Arc::new(ValorantSource::new(cfg.clone())));
    }
    if let Some(cfg) = enabled(&declared.cs2) {
        info!("Registering CS2 source");
        sources.push(Arc::new(Cs2Source::new(cfg.clone())));
    }
    if let Some(cfg) = enabled(&declared.pubg) {
        info!("Registering PUBG source");
        sources.push(Arc::new(PubgSource::new(cfg.clone())));
    }
    if let Some(cfg) = enabled(&declared.dota) {
        info!("Registering Dota source");
        sources.push(Arc::new(DotaSource::new(cfg.clone())));
    }
    if let Some(cfg) = enabled(&declared.fortnite) {
        info!("Registering Fortnite source");
        sources.push(Arc::new(FortniteSource::new(cfg.clone())));
    }
    if let Some(cfg) = enabled(&declared.rivals) {
        match RivalsSource::new(cfg.clone()) {
            Ok(source) => {
                info!("Registering Marvel Rivals source");
                sources.push(Arc::new(source));
            }
            Err(e) => error!("Failed to create Marvel Rivals source: {}", e),
        }
    }
    if let Some(cfg) = enabled(&declared.apex) {
        info!("Registering Apex Legends source");
        sources.push(Arc::new(ApexSource::new(cfg.clone())));
    }

    sources
}

fn enabled(config: &Option<SourceConfig>) -> Option<&SourceConfig> {
    config.as_ref().filter(|c| c.enabled)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
