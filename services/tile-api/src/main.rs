//! Tile API Server
//!
//! Serves 32x32 pixel grids sampled from remote imagery tiles.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tile_api::config::ServiceConfig;
use tile_api::routes::build_router;
use tile_api::state::AppState;

/// Tile API Server
#[derive(Parser, Debug)]
#[command(name = "tile-api")]
#[command(about = "Data tile server: layer lookup, tile fetch and pixel grid reduction")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "TILE_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "TILE_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Directory holding layers.yaml
    #[arg(long, default_value = "config", env = "TILE_CONFIG_DIR")]
    config_dir: PathBuf,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting tile API server");

    let config = ServiceConfig::from_env()?;
    info!(
        imagery_host = %config.imagery_host,
        zoom = config.zoom,
        reference = ?config.reference_nw,
        default_layer = %config.default_layer,
        "Loaded service config"
    );

    let state = Arc::new(AppState::from_config(config, &args.config_dir, Some(prometheus))?);
    let app = build_router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Tile API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
