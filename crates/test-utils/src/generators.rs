//! Pixel pattern generators.
//!
//! Each pattern is a pure function of `(x, y)` so tests can compute the
//! expected value of any pixel without keeping the buffer around.

/// RGB value of [`rgb_gradient`] at `(x, y)`.
pub fn rgb_at(x: usize, y: usize) -> [u8; 3] {
    [(x * 4) as u8, (y * 4) as u8, (x + y) as u8]
}

/// Row-major RGB buffer following [`rgb_at`].
///
/// # Example
///
/// ```
/// use test_utils::{rgb_at, rgb_gradient};
///
/// let pixels = rgb_gradient(4, 2);
/// assert_eq!(pixels.len(), 4 * 2 * 3);
/// assert_eq!(&pixels[3..6], &rgb_at(1, 0));
/// ```
pub fn rgb_gradient(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&rgb_at(x, y));
        }
    }
    data
}

/// Grey level of [`luma_gradient`] at `(x, y)`.
pub fn luma_at(x: usize, y: usize) -> u8 {
    (x * 2 + y * 5) as u8
}

/// Row-major greyscale buffer following [`luma_at`].
pub fn luma_gradient(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(luma_at(x, y));
        }
    }
    data
}

/// Palette index of [`index_pattern`] at `(x, y)` for a palette of
/// `colors` entries.
pub fn index_at(x: usize, y: usize, colors: usize) -> u8 {
    ((x + y * 3) % colors) as u8
}

/// Row-major palette indices following [`index_at`].
pub fn index_pattern(width: usize, height: usize, colors: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(index_at(x, y, colors));
        }
    }
    data
}

/// A palette of `colors` distinct RGB entries.
pub fn test_palette(colors: usize) -> Vec<[u8; 3]> {
    (0..colors)
        .map(|i| [(i * 17) as u8, 255 - (i * 9) as u8, (i * 31) as u8])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_pattern_within_palette() {
        let indices = index_pattern(40, 40, 16);
        assert!(indices.iter().all(|&i| i < 16));
        assert_eq!(indices[41], index_at(1, 1, 16));
    }

    #[test]
    fn test_luma_gradient_row_major() {
        let data = luma_gradient(8, 3);
        assert_eq!(data[8], luma_at(0, 1));
        assert_eq!(data[23], luma_at(7, 2));
    }
}
