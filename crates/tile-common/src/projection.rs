//! Web Mercator projection onto the zoom-0 pixel plane.
//!
//! The world at zoom 0 is a single 256x256 square with the origin (0, 0) at
//! the north-west corner and (128, 128) at latitude 0, longitude 0.

use std::f64::consts::PI;

use crate::geo::{GeoPoint, PixelPoint};

/// Width of the zoom-0 world in pixels.
pub const WORLD_SIZE: f64 = 256.0;

/// Pixel coordinate of the prime meridian and the equator.
const ORIGIN: f64 = WORLD_SIZE / 2.0;

const PIXELS_PER_LON_DEGREE: f64 = WORLD_SIZE / 360.0;

const PIXELS_PER_LON_RADIAN: f64 = WORLD_SIZE / (2.0 * PI);

/// Bound on |sin(latitude)|; keeps the logarithm finite at the poles.
pub const SIN_LAT_LIMIT: f64 = 0.9999;

/// Project a geodetic point onto the zoom-0 pixel plane.
pub fn to_pixel_space(point: &GeoPoint) -> PixelPoint {
    let sin_lat = point.latitude.to_radians().sin().clamp(-SIN_LAT_LIMIT, SIN_LAT_LIMIT);

    let x = ORIGIN + point.longitude * PIXELS_PER_LON_DEGREE;
    let y = ORIGIN + ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() * -PIXELS_PER_LON_RADIAN;

    PixelPoint::new(x, y)
}

/// Inverse of [`to_pixel_space`].
pub fn to_geo_point(pixel: &PixelPoint) -> GeoPoint {
    let longitude = (pixel.x - ORIGIN) / PIXELS_PER_LON_DEGREE;

    // ln((1+s)/(1-s)) = 2·atanh(s), so s = tanh(l/2) and lat = gd(l/2).
    let l = (pixel.y - ORIGIN) / -PIXELS_PER_LON_RADIAN;
    let latitude = (2.0 * (l / 2.0).exp().atan() - PI / 2.0).to_degrees();

    GeoPoint::new(latitude, longitude)
}
