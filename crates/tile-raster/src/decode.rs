//! Decoding of fetched tile bytes.
//!
//! Indexed PNGs are read with the `png` crate so the palette indices survive
//! decoding (mode "P"). Everything else goes through `image`, which reports
//! greyscale as "L" and colour as "RGB". 16-bit greyscale and colour are
//! scaled down to 8 bits. Any other layout is kept as [`ColorMode::Other`]
//! and rejected later by the reducer.

use image::{DynamicImage, GenericImageView};
use tile_common::{TileError, TileResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG colour type 3 (palette indices).
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// Colour layout of a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorMode {
    /// Palette indices, one byte per pixel
    Palette,
    /// 8-bit greyscale
    Luma,
    /// 8-bit RGB
    Rgb,
    /// Layouts the reducer rejects: anything with alpha (RGBA, grey+alpha)
    /// and floating-point samples
    Other(String),
}

impl ColorMode {
    pub fn name(&self) -> &str {
        match self {
            ColorMode::Palette => "P",
            ColorMode::Luma => "L",
            ColorMode::Rgb => "RGB",
            ColorMode::Other(name) => name.as_str(),
        }
    }

    fn channels(&self) -> usize {
        match self {
            ColorMode::Palette | ColorMode::Luma => 1,
            ColorMode::Rgb => 3,
            ColorMode::Other(_) => 0,
        }
    }
}

/// One sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelValue {
    /// Single channel (palette index or grey level)
    Intensity(u8),
    Rgb([u8; 3]),
}

/// Read access to a decoded image.
pub trait DecodedTile {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn mode(&self) -> &ColorMode;

    /// Pixel at (row, col); `None` when out of bounds or the mode carries
    /// no samples.
    fn pixel(&self, row: u32, col: u32) -> Option<PixelValue>;
}

/// A decoded image held as row-major samples.
#[derive(Debug, Clone)]
pub struct TileImage {
    width: u32,
    height: u32,
    mode: ColorMode,
    samples: Vec<u8>,
}

impl TileImage {
    /// Wrap raw row-major samples. The sample count must match the mode.
    pub fn new(width: u32, height: u32, mode: ColorMode, samples: Vec<u8>) -> TileResult<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if samples.len() != expected {
            return Err(TileError::ImageDecodeFailed(format!(
                "{} samples for a {}x{} {} image, expected {}",
                samples.len(),
                width,
                height,
                mode.name(),
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            mode,
            samples,
        })
    }

    /// An image in a mode the reducer does not handle; carries no samples.
    pub fn unsupported(width: u32, height: u32, mode_name: impl Into<String>) -> Self {
        Self {
            width,
            height,
            mode: ColorMode::Other(mode_name.into()),
            samples: Vec::new(),
        }
    }
}

impl DecodedTile for TileImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn mode(&self) -> &ColorMode {
        &self.mode
    }

    fn pixel(&self, row: u32, col: u32) -> Option<PixelValue> {
        if row >= self.height || col >= self.width {
            return None;
        }

        let channels = self.mode.channels();
        let offset = (row as usize * self.width as usize + col as usize) * channels;

        match channels {
            1 => self.samples.get(offset).map(|v| PixelValue::Intensity(*v)),
            3 => self
                .samples
                .get(offset..offset + 3)
                .map(|c| PixelValue::Rgb([c[0], c[1], c[2]])),
            _ => None,
        }
    }
}

/// Decode fetched tile bytes.
pub fn decode_tile_image(bytes: &[u8]) -> TileResult<TileImage> {
    if is_indexed_png(bytes) {
        decode_indexed_png(bytes)
    } else {
        decode_with_image(bytes)
    }
}

/// Peek at the IHDR colour type without decoding.
fn is_indexed_png(bytes: &[u8]) -> bool {
    bytes.len() >= 26
        && bytes[..8] == PNG_SIGNATURE
        && &bytes[12..16] == b"IHDR"
        && bytes[25] == PNG_COLOR_TYPE_INDEXED
}

fn decode_indexed_png(bytes: &[u8]) -> TileResult<TileImage> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut reader = decoder
        .read_info()
        .map_err(|e| TileError::ImageDecodeFailed(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| TileError::ImageDecodeFailed(e.to_string()))?;

    let bits = match frame.bit_depth {
        png::BitDepth::One => 1,
        png::BitDepth::Two => 2,
        png::BitDepth::Four => 4,
        png::BitDepth::Eight => 8,
        png::BitDepth::Sixteen => {
            return Err(TileError::ImageDecodeFailed(
                "16-bit palette indices".to_string(),
            ))
        }
    };

    let indices = unpack_indices(&buf, frame.width, frame.height, frame.line_size, bits);
    TileImage::new(frame.width, frame.height, ColorMode::Palette, indices)
}

/// Expand packed sub-byte palette indices to one byte per pixel.
fn unpack_indices(buf: &[u8], width: u32, height: u32, line_size: usize, bits: usize) -> Vec<u8> {
    let mut indices = Vec::with_capacity(width as usize * height as usize);
    let mask = ((1u16 << bits) - 1) as u8;

    for row in 0..height as usize {
        let line = &buf[row * line_size..(row + 1) * line_size];
        for col in 0..width as usize {
            let bit = col * bits;
            let shift = 8 - bits - (bit % 8);
            indices.push((line[bit / 8] >> shift) & mask);
        }
    }

    indices
}

fn decode_with_image(bytes: &[u8]) -> TileResult<TileImage> {
    let img =
        image::load_from_memory(bytes).map_err(|e| TileError::ImageDecodeFailed(e.to_string()))?;
    let (width, height) = img.dimensions();

    match img {
        DynamicImage::ImageRgb8(buf) => TileImage::new(width, height, ColorMode::Rgb, buf.into_raw()),
        DynamicImage::ImageLuma8(buf) => {
            TileImage::new(width, height, ColorMode::Luma, buf.into_raw())
        }
        // 16-bit: rescale each sample to 0..=255
        DynamicImage::ImageRgb16(_) => {
            TileImage::new(width, height, ColorMode::Rgb, img.to_rgb8().into_raw())
        }
        DynamicImage::ImageLuma16(_) => {
            TileImage::new(width, height, ColorMode::Luma, img.to_luma8().into_raw())
        }
        other => Ok(TileImage::unsupported(
            width,
            height,
            format!("{:?}", other.color()),
        )),
    }
}
