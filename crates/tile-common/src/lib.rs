//! Common types and utilities shared across the data tile crates.

pub mod error;
pub mod geo;
pub mod layer;
pub mod projection;
pub mod tile;
pub mod time;
pub mod url;

pub use error::{TileError, TileResult};
pub use geo::{GeoBounds, GeoPoint, PixelPoint};
pub use layer::{LayerDescriptor, LayerRegistry};
pub use tile::TileAddress;
pub use time::DateCursor;
pub use url::TileUrlBuilder;
