//! Directory handlers: users, maps and registered layers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;
use tile_common::LayerDescriptor;

use super::ApiResult;
use crate::state::AppState;

/// Demo account returned for every user id.
const DEMO_USER_NAME: &str = "spaceapps";
const DEMO_MAP_ID: &str = "map_id1";

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_name: String,
    pub uid: String,
    pub maps: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub mid: String,
    pub layers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LayerResponse {
    pub lid: String,
    pub layer_name: String,
    pub source: String,
}

impl LayerResponse {
    fn from_descriptor(key: &str, layer: &LayerDescriptor) -> Self {
        let layer_name = if layer.title.is_empty() {
            key.to_string()
        } else {
            layer.title.clone()
        };

        Self {
            lid: key.to_string(),
            layer_name,
            source: layer.product.clone(),
        }
    }
}

/// GET /
pub async fn index_handler() -> &'static str {
    "Hello World"
}

/// GET /user/:uid
pub async fn user_handler(Path(uid): Path<String>) -> Json<UserResponse> {
    Json(UserResponse {
        user_name: DEMO_USER_NAME.to_string(),
        uid,
        maps: vec![DEMO_MAP_ID.to_string()],
    })
}

/// GET /map/:mid
pub async fn map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(mid): Path<String>,
) -> Json<MapResponse> {
    let layers = state
        .service
        .registry()
        .keys()
        .into_iter()
        .map(String::from)
        .collect();

    Json(MapResponse { mid, layers })
}

/// GET /map/:mid/layer/:lid
pub async fn layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((_mid, lid)): Path<(String, String)>,
) -> ApiResult<Json<LayerResponse>> {
    let layer = state.service.registry().resolve(&lid)?;
    Ok(Json(LayerResponse::from_descriptor(&lid, layer)))
}

/// GET /layers
pub async fn layers_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<LayerResponse>> {
    let layers = state
        .service
        .registry()
        .iter()
        .map(|(key, layer)| LayerResponse::from_descriptor(key, layer))
        .collect();

    Json(layers)
}
