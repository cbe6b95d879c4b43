//! Tile handlers: pixel grids, tile addresses and bounds.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use tile_common::{GeoBounds, TileAddress, TileError};
use tile_raster::PixelGrid;

use super::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LayerQuery {
    pub layer: Option<String>,
}

impl LayerQuery {
    fn key<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.layer
            .as_deref()
            .unwrap_or(state.config.default_layer.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct PixelDataResponse {
    pub pixel_data: PixelGrid,
}

#[derive(Debug, Serialize)]
pub struct TileResponse {
    pub mid: String,
    pub layer: String,
    pub tile: TileAddress,
    pub bounds: GeoBounds,
}

/// GET /map/:mid/data?layer=
pub async fn data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(_mid): Path<String>,
    Query(query): Query<LayerQuery>,
) -> ApiResult<Json<PixelDataResponse>> {
    let grid = state.service.pixel_grid(query.key(&state)).await?;
    Ok(Json(PixelDataResponse { pixel_data: grid }))
}

/// GET /map/:mid/tile?layer=
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(mid): Path<String>,
    Query(query): Query<LayerQuery>,
) -> ApiResult<Json<TileResponse>> {
    let layer = query.key(&state);
    let tile = state.service.tile_address(layer)?;

    Ok(Json(TileResponse {
        mid,
        layer: layer.to_string(),
        tile,
        bounds: state.service.bounds(&tile),
    }))
}

/// GET /tiles/:z/:x/:y/bounds
pub async fn bounds_handler(
    Extension(state): Extension<Arc<AppState>>,
    path: Result<Path<(u32, i64, i64)>, PathRejection>,
) -> ApiResult<Json<GeoBounds>> {
    let Path((z, x, y)) = path.map_err(|rejection| {
        ApiError(TileError::InvalidParameter {
            param: "path".to_string(),
            message: rejection.body_text(),
        })
    })?;
    let bounds = state.service.checked_bounds(&TileAddress::new(x, y, z))?;
    Ok(Json(bounds))
}
