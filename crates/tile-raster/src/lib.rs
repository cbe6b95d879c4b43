//! Tile image decoding and reduction to a fixed numeric pixel grid.
//!
//! - `decode`: bytes → [`TileImage`] with a reported colour mode
//! - `reduce`: [`TileImage`] → 32x32 RGB [`PixelGrid`]

pub mod decode;
pub mod reduce;

pub use decode::{decode_tile_image, ColorMode, DecodedTile, PixelValue, TileImage};
pub use reduce::{reduce_to_grid, PixelGrid, GRID_SIZE};

use tile_common::TileResult;
use tracing::debug;

/// Decode fetched tile bytes and reduce them to a [`PixelGrid`].
pub fn grid_from_bytes(bytes: &[u8]) -> TileResult<PixelGrid> {
    let image = decode_tile_image(bytes)?;
    debug!(
        width = image.width(),
        height = image.height(),
        mode = image.mode().name(),
        "Decoded tile image"
    );
    reduce_to_grid(&image)
}
