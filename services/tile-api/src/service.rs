//! Tile pipeline: layer → tile → URL → fetch → pixel grid.

use std::sync::Arc;

use tile_common::tile::{bounds_of, tile_at, MAX_ZOOM};
use tile_common::{
    GeoBounds, GeoPoint, LayerRegistry, TileAddress, TileError, TileResult, TileUrlBuilder,
};
use tile_raster::{grid_from_bytes, PixelGrid};
use tracing::{info, instrument, warn};

use crate::config::ServiceConfig;
use crate::fetch::TileFetcher;
use crate::metrics::{MetricsCollector, Timer};

/// Core operations exposed to the HTTP layer.
pub struct TileService {
    registry: Arc<LayerRegistry>,
    urls: TileUrlBuilder,
    fetcher: Arc<dyn TileFetcher>,
    metrics: Arc<MetricsCollector>,
    reference: GeoPoint,
    zoom: u32,
}

impl TileService {
    pub fn new(
        config: &ServiceConfig,
        registry: Arc<LayerRegistry>,
        fetcher: Arc<dyn TileFetcher>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            registry,
            urls: TileUrlBuilder::new(config.imagery_host.clone()),
            fetcher,
            metrics,
            reference: config.reference_nw,
            zoom: config.zoom,
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Tile containing the reference point at the configured zoom.
    ///
    /// Fails with `UnknownLayer` when `layer_key` is not registered.
    pub fn tile_address(&self, layer_key: &str) -> TileResult<TileAddress> {
        self.registry.resolve(layer_key)?;
        Ok(tile_at(&self.reference, self.zoom))
    }

    /// Fetch the layer's tile and reduce it to a 32x32 RGB grid.
    ///
    /// Each call on a rotating-date layer advances the shared date cursor
    /// once, before the fetch.
    #[instrument(skip(self))]
    pub async fn pixel_grid(&self, layer_key: &str) -> TileResult<PixelGrid> {
        self.metrics.record_tile_request(layer_key);

        match self.fetch_and_reduce(layer_key).await {
            Ok(grid) => {
                self.metrics.record_grid_served();
                Ok(grid)
            }
            Err(e) => {
                warn!(layer = layer_key, error = %e, "Pixel grid request failed");
                self.metrics.record_error(&e).await;
                Err(e)
            }
        }
    }

    async fn fetch_and_reduce(&self, layer_key: &str) -> TileResult<PixelGrid> {
        let layer = self.registry.resolve(layer_key)?;
        let tile = tile_at(&self.reference, self.zoom);
        let date = self.registry.resolve_date(layer);
        let url = self.urls.for_layer(layer, &date, &tile);

        let timer = Timer::start();
        let body = self.fetcher.fetch(&url).await?;
        self.metrics.record_fetch(body.len(), timer.elapsed_us()).await;

        info!(
            layer = layer_key,
            tile = %tile,
            date = %date,
            url = %url,
            bytes = body.len(),
            elapsed_ms = timer.elapsed_ms(),
            "Fetched tile"
        );

        grid_from_bytes(&body)
    }

    /// Geographic bounds of `tile`, after normalisation.
    pub fn bounds(&self, tile: &TileAddress) -> GeoBounds {
        bounds_of(tile)
    }

    /// [`TileService::bounds`] for an address taken from a request.
    pub fn checked_bounds(&self, tile: &TileAddress) -> TileResult<GeoBounds> {
        if tile.z > MAX_ZOOM {
            return Err(TileError::InvalidParameter {
                param: "z".to_string(),
                message: format!("zoom {} exceeds maximum {}", tile.z, MAX_ZOOM),
            });
        }
        Ok(self.bounds(tile))
    }
}
