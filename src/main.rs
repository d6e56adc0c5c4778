//! flightsearch: runs the startup search batch, then serves the HTTP API

use anyhow::Result;
use flightsearch::{
    config::{self, Settings},
    demo,
    metrics::Metrics,
    network::EsClient,
    search::QueryService,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting flightsearch v{}", flightsearch::VERSION);

    // Load configuration
    let settings = config::init(load_settings()?)?;
    let es = &settings.elasticsearch;
    info!("Searching index {} at {}", es.index, es.url);

    // One client for the whole process
    let client = EsClient::with_settings(es)?;
    if let Err(e) = client.ping().await {
        warn!("Elasticsearch is not reachable yet: {}", e);
    }

    let metrics = Arc::new(Metrics::new());
    let service = QueryService::new(Arc::new(client), es.index.clone())
        .with_timeout(es.timeout()?)
        .with_max_timeout(es.max_timeout()?)
        .with_metrics(metrics.clone());

    if settings.demo.enabled {
        demo::run(&service, settings.demo.preview_hits).await;
    }

    let state = AppState::new(service, metrics);
    let app = create_router(state);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Server is running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from the first file found, or defaults, then apply the environment
fn load_settings() -> Result<Settings> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var("FLIGHTSEARCH_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    candidates.push(PathBuf::from("/etc/flightsearch/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("flightsearch/settings.yml"));
    }

    let mut settings = match candidates.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}
