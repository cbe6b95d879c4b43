//! Service configuration read from the environment.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tile_common::tile::MAX_ZOOM;
use tile_common::time::{default_epoch, parse_date};
use tile_common::url::DEFAULT_IMAGERY_HOST;
use tile_common::GeoPoint;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ZOOM: u32 = 4;
pub const DEFAULT_LAYER: &str = "clouds";

/// North-west corner of the default reference box (Seattle area).
pub const DEFAULT_REFERENCE_NW: (f64, f64) = (47.7, -122.5);

/// South-east corner of the default reference box.
pub const DEFAULT_REFERENCE_SE: (f64, f64) = (47.5, -122.2);

/// Runtime settings for the tile pipeline.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Imagery host used in tile URLs (`TILE_IMAGERY_HOST`)
    pub imagery_host: String,

    /// Remote fetch timeout (`TILE_FETCH_TIMEOUT_SECS`)
    pub fetch_timeout: Duration,

    /// Zoom level for tile lookups (`TILE_ZOOM`)
    pub zoom: u32,

    /// North-west corner of the reference box; the sampled tile is the one
    /// containing this point (`TILE_REFERENCE_NW`, "lat,lon")
    pub reference_nw: GeoPoint,

    /// South-east corner of the reference box (`TILE_REFERENCE_SE`)
    pub reference_se: GeoPoint,

    /// First date of the rotating date cursor (`TILE_DATE_EPOCH`)
    pub date_epoch: NaiveDate,

    /// Layer used when a request names none (`TILE_DEFAULT_LAYER`)
    pub default_layer: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            imagery_host: DEFAULT_IMAGERY_HOST.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            zoom: DEFAULT_ZOOM,
            reference_nw: GeoPoint::new(DEFAULT_REFERENCE_NW.0, DEFAULT_REFERENCE_NW.1),
            reference_se: GeoPoint::new(DEFAULT_REFERENCE_SE.0, DEFAULT_REFERENCE_SE.1),
            date_epoch: default_epoch(),
            default_layer: DEFAULT_LAYER.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset variables keep their
    /// defaults; set but malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("TILE_IMAGERY_HOST") {
            config.imagery_host = host;
        }

        if let Some(secs) = lookup("TILE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid TILE_FETCH_TIMEOUT_SECS: {}", secs))?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        if let Some(zoom) = lookup("TILE_ZOOM") {
            config.zoom = zoom
                .trim()
                .parse()
                .with_context(|| format!("Invalid TILE_ZOOM: {}", zoom))?;
        }

        if let Some(nw) = lookup("TILE_REFERENCE_NW") {
            config.reference_nw = GeoPoint::from_pair_string(&nw)
                .with_context(|| format!("Invalid TILE_REFERENCE_NW: {}", nw))?;
        }

        if let Some(se) = lookup("TILE_REFERENCE_SE") {
            config.reference_se = GeoPoint::from_pair_string(&se)
                .with_context(|| format!("Invalid TILE_REFERENCE_SE: {}", se))?;
        }

        if let Some(epoch) = lookup("TILE_DATE_EPOCH") {
            config.date_epoch =
                parse_date(&epoch).with_context(|| format!("Invalid TILE_DATE_EPOCH: {}", epoch))?;
        }

        if let Some(layer) = lookup("TILE_DEFAULT_LAYER") {
            config.default_layer = layer;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.zoom > MAX_ZOOM {
            bail!("Zoom {} exceeds maximum {}", self.zoom, MAX_ZOOM);
        }
        if self.fetch_timeout.is_zero() {
            bail!("Fetch timeout must be greater than zero");
        }
        if self.imagery_host.trim().is_empty() {
            bail!("Imagery host must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.imagery_host, "gibs.earthdata.nasa.gov");
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.zoom, 4);
        assert_eq!(config.reference_nw, GeoPoint::new(47.7, -122.5));
        assert_eq!(config.date_epoch, default_epoch());
        assert_eq!(config.default_layer, "clouds");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("TILE_IMAGERY_HOST", "tiles.example.org"),
            ("TILE_FETCH_TIMEOUT_SECS", "5"),
            ("TILE_ZOOM", "7"),
            ("TILE_REFERENCE_NW", "-33.87, 151.21"),
            ("TILE_DATE_EPOCH", "2020-06-01"),
            ("TILE_DEFAULT_LAYER", "air_quality"),
        ]))
        .unwrap();

        assert_eq!(config.imagery_host, "tiles.example.org");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.zoom, 7);
        assert_eq!(config.reference_nw, GeoPoint::new(-33.87, 151.21));
        assert_eq!(config.date_epoch, parse_date("2020-06-01").unwrap());
        assert_eq!(config.default_layer, "air_quality");
    }

    #[test]
    fn test_zoom_limit() {
        let result = ServiceConfig::from_lookup(lookup_from(&[("TILE_ZOOM", "31")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_values() {
        assert!(ServiceConfig::from_lookup(lookup_from(&[("TILE_ZOOM", "four")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup_from(&[("TILE_REFERENCE_NW", "47.7")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup_from(&[("TILE_DATE_EPOCH", "01/01/2019")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup_from(&[("TILE_FETCH_TIMEOUT_SECS", "0")])).is_err());
    }
}
