//! Tile addressing on the Web Mercator pixel plane.
//!
//! At zoom `z` the 256x256 world is split into `2^z` x `2^z` tiles, so a
//! tile covers `256 / 2^z` zoom-0 pixels on each side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoBounds, GeoPoint, PixelPoint};
use crate::projection::{to_geo_point, to_pixel_space, WORLD_SIZE};

/// Highest zoom level accepted at the service boundary.
pub const MAX_ZOOM: u32 = 30;

/// A tile coordinate (z/x/y).
///
/// `x` and `y` may lie outside `[0, 2^z)` until [`TileAddress::normalize`]
/// wraps them back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    /// Column
    pub x: i64,
    /// Row (grows southward)
    pub y: i64,
    /// Zoom level
    pub z: u32,
}

impl TileAddress {
    pub fn new(x: i64, y: i64, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Number of tiles along each axis at this tile's zoom.
    ///
    /// Exact up to zoom 127; saturates at `u128::MAX` beyond that.
    pub fn matrix_size(&self) -> u128 {
        1u128.checked_shl(self.z).unwrap_or(u128::MAX)
    }

    /// Wrap `x` and `y` into `[0, 2^z)` using floor modulo.
    ///
    /// Defined for every zoom. Past zoom 63 a wrapped negative coordinate no
    /// longer fits in `i64` and saturates at `i64::MAX`.
    pub fn normalize(&self) -> TileAddress {
        let n = self.matrix_size();
        TileAddress {
            x: wrap_coordinate(self.x, n),
            y: wrap_coordinate(self.y, n),
            z: self.z,
        }
    }

    /// Side length of this tile in zoom-0 pixels.
    pub fn pixel_size(&self) -> f64 {
        tile_pixel_size(self.z)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

fn wrap_coordinate(coord: i64, matrix_size: u128) -> i64 {
    // A modulus past 2^64 gives the same i64 result: unchanged or saturated.
    let n = matrix_size.min(1u128 << 64) as i128;
    i64::try_from((coord as i128).rem_euclid(n)).unwrap_or(i64::MAX)
}

fn tile_pixel_size(zoom: u32) -> f64 {
    WORLD_SIZE / f64::from(zoom).exp2()
}

/// Find the tile containing `point` at `zoom`.
pub fn tile_at(point: &GeoPoint, zoom: u32) -> TileAddress {
    let tile_size = tile_pixel_size(zoom);
    let p = to_pixel_space(point);

    TileAddress {
        x: (p.x / tile_size).floor() as i64,
        y: (p.y / tile_size).floor() as i64,
        z: zoom,
    }
}

/// Geographic bounds of a tile. The tile is normalized first.
pub fn bounds_of(tile: &TileAddress) -> GeoBounds {
    let tile = tile.normalize();
    let size = tile.pixel_size();

    let left = tile.x as f64 * size;
    let top = tile.y as f64 * size;

    // Mercator y grows southward: the bottom edge is the south side.
    let southwest = to_geo_point(&PixelPoint::new(left, top + size));
    let northeast = to_geo_point(&PixelPoint::new(left + size, top));

    GeoBounds::new(southwest, northeast)
}
