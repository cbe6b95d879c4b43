//! Layer descriptors and the process-wide layer registry.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TileError, TileResult};
use crate::time::{self, DateCursor};

pub const DEFAULT_TILE_MATRIX_SET: &str = "GoogleMapsCompatible_Level6";
pub const DEFAULT_COORDINATE_SYSTEM: &str = "3857";
pub const DEFAULT_FILE_EXTENSION: &str = "png";

fn default_tile_matrix_set() -> String {
    DEFAULT_TILE_MATRIX_SET.to_string()
}

fn default_coordinate_system() -> String {
    DEFAULT_COORDINATE_SYSTEM.to_string()
}

fn default_file_extension() -> String {
    DEFAULT_FILE_EXTENSION.to_string()
}

/// A remote imagery product backing one layer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Human-readable name for directory listings
    #[serde(default)]
    pub title: String,

    /// Remote product identifier (e.g., "MODIS_Terra_CorrectedReflectance_TrueColor")
    pub product: String,

    /// WMTS tile matrix set identifier
    #[serde(default = "default_tile_matrix_set")]
    pub tile_matrix_set: String,

    /// Fixed imagery date; `None` uses the shared rotating cursor
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// EPSG code without the prefix (e.g., "3857")
    #[serde(default = "default_coordinate_system")]
    pub coordinate_system: String,

    /// Tile file extension (e.g., "png", "jpg")
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl LayerDescriptor {
    /// A descriptor with every optional field at its default.
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            product: product.into(),
            tile_matrix_set: default_tile_matrix_set(),
            date: None,
            coordinate_system: default_coordinate_system(),
            file_extension: default_file_extension(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tile_matrix_set(mut self, tile_matrix_set: impl Into<String>) -> Self {
        self.tile_matrix_set = tile_matrix_set.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_coordinate_system(mut self, coordinate_system: impl Into<String>) -> Self {
        self.coordinate_system = coordinate_system.into();
        self
    }

    pub fn with_file_extension(mut self, file_extension: impl Into<String>) -> Self {
        self.file_extension = file_extension.into();
        self
    }

    /// Whether this layer draws its date from the shared cursor.
    pub fn has_rotating_date(&self) -> bool {
        self.date.is_none()
    }
}

/// Registry of layer descriptors keyed by layer key.
///
/// Populated once at startup and read-only afterwards, apart from the shared
/// date cursor which is only touched under its lock.
#[derive(Debug)]
pub struct LayerRegistry {
    layers: BTreeMap<String, LayerDescriptor>,
    cursor: Mutex<DateCursor>,
}

impl LayerRegistry {
    /// Create an empty registry whose cursor starts at `epoch`.
    pub fn new(epoch: NaiveDate) -> Self {
        Self {
            layers: BTreeMap::new(),
            cursor: Mutex::new(DateCursor::new(epoch)),
        }
    }

    /// Registry pre-populated with the built-in GIBS layers.
    pub fn with_builtin_layers(epoch: NaiveDate) -> Self {
        let mut registry = Self::new(epoch);
        for (key, layer) in builtin_layers() {
            registry.insert(key, layer);
        }
        registry
    }

    /// Register a layer. Replaces any previous descriptor for the key.
    pub fn insert(&mut self, key: impl Into<String>, layer: LayerDescriptor) {
        self.layers.insert(key.into(), layer);
    }

    /// Look up a layer by key.
    pub fn resolve(&self, key: &str) -> TileResult<&LayerDescriptor> {
        self.layers
            .get(key)
            .ok_or_else(|| TileError::UnknownLayer(key.to_string()))
    }

    /// Imagery date for a layer, formatted as `YYYY-MM-DD`.
    ///
    /// Fixed-date layers return their date and leave the cursor alone. Every
    /// other call advances the shared cursor exactly once.
    pub fn resolve_date(&self, layer: &LayerDescriptor) -> String {
        self.resolve_date_on(layer, time::today())
    }

    /// [`LayerRegistry::resolve_date`] against an explicit "today".
    pub fn resolve_date_on(&self, layer: &LayerDescriptor, today: NaiveDate) -> String {
        if let Some(date) = layer.date {
            return time::format_date(&date);
        }

        let date = {
            let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
            cursor.advance(today)
        };

        debug!(product = %layer.product, date = %date, "Advanced date cursor");
        time::format_date(&date)
    }

    /// Current position of the shared date cursor.
    pub fn cursor_position(&self) -> NaiveDate {
        self.cursor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
    }

    /// Iterate layers in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayerDescriptor)> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All layer keys in order.
    pub fn keys(&self) -> Vec<&str> {
        self.layers.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::with_builtin_layers(time::default_epoch())
    }
}

/// Layers served when no layer configuration file is present.
pub fn builtin_layers() -> Vec<(&'static str, LayerDescriptor)> {
    vec![
        (
            "air_quality",
            LayerDescriptor::new("MODIS_Combined_Value_Added_AOD").with_title("Air Quality"),
        ),
        (
            "blue_marble",
            LayerDescriptor::new("BlueMarble_NextGeneration")
                .with_title("Blue Marble")
                .with_tile_matrix_set("GoogleMapsCompatible_Level8")
                .with_file_extension("jpg")
                .with_date(NaiveDate::from_ymd_opt(2004, 8, 1).unwrap_or_default()),
        ),
        (
            "clouds",
            LayerDescriptor::new("MODIS_Terra_CorrectedReflectance_TrueColor")
                .with_title("Clouds")
                .with_tile_matrix_set("250m")
                .with_coordinate_system("4326")
                .with_file_extension("jpg"),
        ),
        (
            "night_lights",
            LayerDescriptor::new("VIIRS_CityLights_2012")
                .with_title("Night Lights")
                .with_tile_matrix_set("GoogleMapsCompatible_Level8")
                .with_file_extension("jpg")
                .with_date(NaiveDate::from_ymd_opt(2012, 1, 1).unwrap_or_default()),
        ),
        (
            "sea_surface_temperature",
            LayerDescriptor::new("GHRSST_L4_MUR_Sea_Surface_Temperature")
                .with_title("Sea Surface Temperature")
                .with_tile_matrix_set("GoogleMapsCompatible_Level7"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_descriptor_defaults() {
        let layer = LayerDescriptor::new("P");
        assert_eq!(layer.tile_matrix_set, "GoogleMapsCompatible_Level6");
        assert_eq!(layer.coordinate_system, "3857");
        assert_eq!(layer.file_extension, "png");
        assert!(layer.has_rotating_date());
    }

    #[test]
    fn test_descriptor_yaml_style_defaults() {
        let layer: LayerDescriptor =
            serde_json::from_str(r#"{"product": "X", "date": "2020-05-01"}"#).unwrap();
        assert_eq!(layer.tile_matrix_set, DEFAULT_TILE_MATRIX_SET);
        assert_eq!(layer.date, Some(date("2020-05-01")));
        assert_eq!(layer.title, "");
    }

    #[test]
    fn test_resolve_unknown_layer() {
        let registry = LayerRegistry::default();
        let err = registry.resolve("nonexistent").unwrap_err();
        assert!(matches!(err, TileError::UnknownLayer(ref k) if k == "nonexistent"));
    }

    #[test]
    fn test_builtin_clouds() {
        let registry = LayerRegistry::default();
        let clouds = registry.resolve("clouds").unwrap();
        assert_eq!(clouds.product, "MODIS_Terra_CorrectedReflectance_TrueColor");
        assert_eq!(clouds.tile_matrix_set, "250m");
        assert_eq!(clouds.coordinate_system, "4326");
        assert_eq!(clouds.file_extension, "jpg");
    }

    #[test]
    fn test_rotating_date_sequence() {
        let registry = LayerRegistry::new(date("2019-01-01"));
        let layer = LayerDescriptor::new("P");
        let today = date("2024-01-01");

        assert_eq!(registry.resolve_date_on(&layer, today), "2019-01-02");
        assert_eq!(registry.resolve_date_on(&layer, today), "2019-01-03");
        assert_eq!(registry.cursor_position(), date("2019-01-03"));
    }

    #[test]
    fn test_fixed_date_leaves_cursor() {
        let registry = LayerRegistry::new(date("2019-01-01"));
        let fixed = LayerDescriptor::new("P").with_date(date("2012-01-01"));

        assert_eq!(registry.resolve_date_on(&fixed, date("2024-01-01")), "2012-01-01");
        assert_eq!(registry.cursor_position(), date("2019-01-01"));
    }

    #[test]
    fn test_cursor_shared_across_layers() {
        let registry = LayerRegistry::new(date("2019-01-01"));
        let a = LayerDescriptor::new("A");
        let b = LayerDescriptor::new("B");
        let today = date("2024-01-01");

        assert_eq!(registry.resolve_date_on(&a, today), "2019-01-02");
        assert_eq!(registry.resolve_date_on(&b, today), "2019-01-03");
        assert_eq!(registry.resolve_date_on(&a, today), "2019-01-04");
    }

    #[test]
    fn test_keys_sorted() {
        let registry = LayerRegistry::default();
        let keys = registry.keys();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(registry.len(), 5);
    }
}
