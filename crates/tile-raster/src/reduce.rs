//! Reduction of a decoded tile to a 32x32 RGB grid.

use serde::{Deserialize, Serialize};
use tile_common::{TileError, TileResult};

use crate::decode::{ColorMode, DecodedTile, PixelValue};

/// Side length of the reduced grid.
pub const GRID_SIZE: usize = 32;

type Cells = [[[u8; 3]; GRID_SIZE]; GRID_SIZE];

/// 32x32 grid of RGB triples, indexed `[row][col]`.
///
/// Serializes as a nested `32 x 32 x 3` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelGrid {
    cells: Cells,
}

impl PixelGrid {
    pub fn get(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]; GRID_SIZE]> {
        self.cells.iter()
    }

    pub fn into_cells(self) -> Cells {
        self.cells
    }
}

/// Sample the top-left 32x32 pixels of `image` into a [`PixelGrid`].
///
/// Cell `[row][col]` is the pixel at `y = row, x = col`. Single-channel
/// values (palette index or grey level) are replicated into all three
/// components; RGB pixels are copied. Images narrower or shorter than the
/// grid are rejected before anything is sampled.
pub fn reduce_to_grid<I: DecodedTile + ?Sized>(image: &I) -> TileResult<PixelGrid> {
    match image.mode() {
        ColorMode::Palette | ColorMode::Luma | ColorMode::Rgb => {}
        ColorMode::Other(name) => return Err(TileError::UnsupportedImageMode(name.clone())),
    }

    let (width, height) = (image.width(), image.height());
    if (width as usize) < GRID_SIZE || (height as usize) < GRID_SIZE {
        return Err(TileError::ImageTooSmall {
            width,
            height,
            required: GRID_SIZE as u32,
        });
    }

    let mut cells: Cells = [[[0u8; 3]; GRID_SIZE]; GRID_SIZE];
    for (row, cells_row) in cells.iter_mut().enumerate() {
        for (col, cell) in cells_row.iter_mut().enumerate() {
            let value = image.pixel(row as u32, col as u32).ok_or_else(|| {
                TileError::Internal(format!("Missing pixel at row {}, col {}", row, col))
            })?;

            *cell = match value {
                PixelValue::Intensity(v) => [v, v, v],
                PixelValue::Rgb(rgb) => rgb,
            };
        }
    }

    Ok(PixelGrid { cells })
}
