//! Data tile service library.
//!
//! Resolves a layer key to a remote imagery tile covering the configured
//! reference point, fetches it, and reduces it to a 32x32 RGB pixel grid.

pub mod config;
pub mod fetch;
pub mod handlers;
pub mod layer_config;
pub mod metrics;
pub mod routes;
pub mod service;
pub mod state;
