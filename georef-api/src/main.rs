//! georef-api - Regions and communes reference service
//!
//! Loads the regions and communes CSV sources once, then serves lookups
//! over HTTP until shut down.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use georef_api::data::{self, GeoData};
use georef_api::{build_router, AppState};
use georef_common::config::{DataPathResolver, LoadPolicy, TomlConfig};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for georef-api
#[derive(Parser, Debug)]
#[command(name = "georef-api")]
#[command(about = "Regions and communes reference API")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides config file)
    #[arg(long, env = "GEOREF_HOST")]
    host: Option<String>,

    /// Directory containing regions.csv and communes.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to do when the data load fails: abort or degraded
    #[arg(long, env = "GEOREF_LOAD_POLICY")]
    load_policy: Option<LoadPolicy>,

    /// Log level when RUST_LOG is unset (overrides config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over configured level
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("georef_api={level},tower_http={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting georef-api v{}", env!("CARGO_PKG_VERSION"));

    let resolver = DataPathResolver::new(args.data_dir.clone(), &config);
    let regions_path = resolver.regions_path();
    let communes_path = resolver.communes_path();
    info!("Regions source: {}", regions_path.display());
    info!("Communes source: {}", communes_path.display());

    // Serving starts only after both sources are loaded (or the failure is tolerated)
    let load_policy = args.load_policy.unwrap_or(config.load_policy);
    let geo_data = match data::load(&regions_path, &communes_path).await {
        Ok(geo_data) => {
            info!(
                "✓ Loaded {} regions and {} communes",
                geo_data.regions.len(),
                geo_data.communes.commune_count()
            );
            geo_data
        }
        Err(e) => match load_policy {
            LoadPolicy::Abort => {
                return Err(anyhow::Error::new(e).context("Failed to load reference data"));
            }
            LoadPolicy::Degraded => {
                warn!("Error loading data: {} (serving empty indices)", e);
                GeoData::empty()
            }
        },
    };

    if config.rate_limit.is_enabled() {
        info!(
            "Rate limit: {} req/s (burst {})",
            config.rate_limit.requests_per_second, config.rate_limit.burst
        );
    } else {
        info!("Rate limiting disabled");
    }

    let state = AppState::new(geo_data).with_rate_limit(&config.rate_limit);
    let app = build_router(state);

    let host = args.host.unwrap_or(config.host);
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
