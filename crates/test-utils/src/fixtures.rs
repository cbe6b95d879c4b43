//! Encoded tile image fixtures.
//!
//! RGB, greyscale (8 and 16-bit), RGBA and JPEG tiles are encoded with `image`. Indexed
//! PNGs are written chunk by chunk so tests control the palette and the
//! bit depth exactly.

use std::io::{Cursor, Write};

use image::{DynamicImage, GrayImage, ImageBuffer, ImageOutputFormat, Luma, Rgb, RgbImage, RgbaImage};

use crate::generators::{index_pattern, luma_gradient, rgb_gradient, test_palette};

/// Reference points used across the test suite, as `(latitude, longitude)`.
pub mod places {
    /// Default reference corner (Seattle area)
    pub const SEATTLE: (f64, f64) = (47.7, -122.5);

    /// Origin of the geographic grid
    pub const NULL_ISLAND: (f64, f64) = (0.0, 0.0);

    /// Southern hemisphere, east of Greenwich
    pub const SYDNEY: (f64, f64) = (-33.87, 151.21);
}

fn encode(image: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .expect("fixture encoding failed");
    buf.into_inner()
}

/// RGB PNG with the given row-major pixels.
pub fn rgb_png(width: u32, height: u32, pixels: Vec<u8>) -> Vec<u8> {
    let image = RgbImage::from_raw(width, height, pixels).expect("pixel count mismatch");
    encode(DynamicImage::ImageRgb8(image), ImageOutputFormat::Png)
}

/// RGB PNG filled with [`rgb_gradient`](crate::generators::rgb_gradient).
pub fn rgb_gradient_png(width: u32, height: u32) -> Vec<u8> {
    rgb_png(width, height, rgb_gradient(width as usize, height as usize))
}

/// 8-bit greyscale PNG filled with [`luma_gradient`](crate::generators::luma_gradient).
pub fn luma_gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = luma_gradient(width as usize, height as usize);
    let image = GrayImage::from_raw(width, height, pixels).expect("pixel count mismatch");
    encode(DynamicImage::ImageLuma8(image), ImageOutputFormat::Png)
}

/// 16-bit RGB PNG holding [`rgb_gradient`](crate::generators::rgb_gradient)
/// widened so each sample `v` becomes `v * 257`.
pub fn rgb16_gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = widen(rgb_gradient(width as usize, height as usize));
    let image: ImageBuffer<Rgb<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, pixels).expect("pixel count mismatch");
    encode(DynamicImage::ImageRgb16(image), ImageOutputFormat::Png)
}

/// 16-bit greyscale PNG holding [`luma_gradient`](crate::generators::luma_gradient)
/// widened the same way.
pub fn luma16_gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = widen(luma_gradient(width as usize, height as usize));
    let image: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, pixels).expect("pixel count mismatch");
    encode(DynamicImage::ImageLuma16(image), ImageOutputFormat::Png)
}

fn widen(samples: Vec<u8>) -> Vec<u16> {
    samples.into_iter().map(|v| u16::from(v) * 257).collect()
}

/// RGBA PNG; decodes to a mode the reducer rejects.
pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 128]));
    encode(DynamicImage::ImageRgba8(image), ImageOutputFormat::Png)
}

/// Solid-colour RGB JPEG.
pub fn solid_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    encode(DynamicImage::ImageRgb8(image), ImageOutputFormat::Jpeg(95))
}

/// Indexed PNG filled with [`index_pattern`](crate::generators::index_pattern)
/// over a palette of `colors` entries.
pub fn indexed_pattern_png(width: u32, height: u32, colors: usize, bit_depth: u8) -> Vec<u8> {
    let indices = index_pattern(width as usize, height as usize, colors);
    indexed_png(width, height, &test_palette(colors), &indices, bit_depth)
}

/// Indexed PNG (colour type 3) from explicit palette indices.
///
/// `bit_depth` must be 1, 2, 4 or 8 and every index must fit in it.
pub fn indexed_png(
    width: u32,
    height: u32,
    palette: &[[u8; 3]],
    indices: &[u8],
    bit_depth: u8,
) -> Vec<u8> {
    assert!(matches!(bit_depth, 1 | 2 | 4 | 8), "unsupported bit depth");
    assert_eq!(indices.len(), (width * height) as usize, "index count mismatch");

    let mut png = Vec::new();
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(bit_depth);
    ihdr.push(3); // indexed
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    let plte: Vec<u8> = palette.iter().flatten().copied().collect();
    write_chunk(&mut png, b"PLTE", &plte);

    let scanlines = pack_scanlines(indices, width as usize, height as usize, bit_depth as usize);
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&scanlines).expect("deflate failed");
    let idat = encoder.finish().expect("deflate failed");
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);
    png
}

/// Filter byte 0 plus MSB-first packed indices for each row.
fn pack_scanlines(indices: &[u8], width: usize, height: usize, bits: usize) -> Vec<u8> {
    let line_len = (width * bits + 7) / 8;
    let mut out = Vec::with_capacity(height * (1 + line_len));

    for row in indices.chunks(width).take(height) {
        out.push(0);
        let mut line = vec![0u8; line_len];
        for (col, &index) in row.iter().enumerate() {
            let bit = col * bits;
            line[bit / 8] |= index << (8 - bits - bit % 8);
        }
        out.extend_from_slice(&line);
    }

    out
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_png_header() {
        let png = indexed_pattern_png(40, 33, 16, 4);
        assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 40);
        assert_eq!(png[24], 4);
        assert_eq!(png[25], 3);
    }

    #[test]
    fn test_pack_scanlines_four_bit() {
        let packed = pack_scanlines(&[1, 2, 3], 3, 1, 4);
        assert_eq!(packed, vec![0, 0x12, 0x30]);
    }

    #[test]
    fn test_indexed_png_readable_by_image() {
        use image::GenericImageView;

        let png = indexed_pattern_png(32, 32, 4, 2);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }

    #[test]
    fn test_sixteen_bit_png_depth() {
        // IHDR bit depth byte
        assert_eq!(rgb16_gradient_png(4, 4)[24], 16);
        assert_eq!(luma16_gradient_png(4, 4)[24], 16);
    }

    #[test]
    fn test_jpeg_magic() {
        let jpeg = solid_jpeg(8, 8, [1, 2, 3]);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
