//! Application state for the tile API.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tile_common::LayerRegistry;

use crate::config::ServiceConfig;
use crate::fetch::{HttpTileFetcher, TileFetcher};
use crate::layer_config::load_layer_registry;
use crate::metrics::MetricsCollector;
use crate::service::TileService;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,
    pub service: TileService,
    pub metrics: Arc<MetricsCollector>,

    /// Renders `/metrics`; absent when no recorder is installed (tests).
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(
        config: ServiceConfig,
        registry: LayerRegistry,
        fetcher: Arc<dyn TileFetcher>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let metrics = Arc::new(MetricsCollector::new());
        let service = TileService::new(
            &config,
            Arc::new(registry),
            fetcher,
            Arc::clone(&metrics),
        );

        Self {
            config,
            service,
            metrics,
            prometheus,
        }
    }

    /// Production state: layers from `config_dir`, HTTP fetcher.
    pub fn from_config(
        config: ServiceConfig,
        config_dir: &Path,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let registry = load_layer_registry(config_dir, config.date_epoch);
        let fetcher = Arc::new(HttpTileFetcher::new(config.fetch_timeout)?);
        Ok(Self::new(config, registry, fetcher, prometheus))
    }
}
