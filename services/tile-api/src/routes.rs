//! Router assembly.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{directory, health, tiles};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Directory
        .route("/", get(directory::index_handler))
        .route("/user/:uid", get(directory::user_handler))
        .route("/map/:mid", get(directory::map_handler))
        .route("/map/:mid/layer/:lid", get(directory::layer_handler))
        .route("/layers", get(directory::layers_handler))
        // Tiles
        .route("/map/:mid/data", get(tiles::data_handler))
        .route("/map/:mid/tile", get(tiles::tile_handler))
        .route("/tiles/:z/:x/:y/bounds", get(tiles::bounds_handler))
        // Health and metrics
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        .route("/api/stats", get(health::stats_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
