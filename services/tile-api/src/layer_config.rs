//! Layer registry loading from `layers.yaml`.
//!
//! ```yaml
//! layers:
//!   clouds:
//!     title: Clouds
//!     product: MODIS_Terra_CorrectedReflectance_TrueColor
//!     tile_matrix_set: 250m
//!     coordinate_system: "4326"
//!     file_extension: jpg
//! ```
//!
//! A missing, unreadable, malformed or empty file falls back to the
//! built-in layers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tile_common::{LayerDescriptor, LayerRegistry};
use tracing::{info, warn};

pub const LAYERS_FILE: &str = "layers.yaml";

#[derive(Debug, Deserialize)]
struct YamlLayerFile {
    #[serde(default)]
    layers: BTreeMap<String, LayerDescriptor>,
}

/// Build the registry from `<config_dir>/layers.yaml`.
pub fn load_layer_registry<P: AsRef<Path>>(config_dir: P, epoch: NaiveDate) -> LayerRegistry {
    let path = config_dir.as_ref().join(LAYERS_FILE);

    let layers = match read_layer_file(&path) {
        Some(layers) if !layers.is_empty() => layers,
        Some(_) => {
            warn!(path = ?path, "Layer config is empty, using built-in layers");
            return LayerRegistry::with_builtin_layers(epoch);
        }
        None => return LayerRegistry::with_builtin_layers(epoch),
    };

    let mut registry = LayerRegistry::new(epoch);
    for (key, layer) in layers {
        registry.insert(key, layer);
    }

    info!(
        path = ?path,
        layers = registry.len(),
        "Layer registry loaded"
    );

    registry
}

fn read_layer_file(path: &Path) -> Option<BTreeMap<String, LayerDescriptor>> {
    if !path.exists() {
        warn!(path = ?path, "Layer config not found, using built-in layers");
        return None;
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, path = ?path, "Failed to read layer config");
            return None;
        }
    };

    match serde_yaml::from_str::<YamlLayerFile>(&contents) {
        Ok(file) => Some(file.layers),
        Err(e) => {
            warn!(error = %e, path = ?path, "Failed to parse layer config");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tile_common::time::default_epoch;

    fn write_layers(dir: &Path, contents: &str) {
        let mut file = fs::File::create(dir.join(LAYERS_FILE)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_missing_file_uses_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_layer_registry(dir.path(), default_epoch());
        assert!(registry.resolve("clouds").is_ok());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_loads_layers_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_layers(
            dir.path(),
            r#"
layers:
  smoke:
    title: Smoke
    product: MODIS_Aqua_Aerosol
  relief:
    product: ASTER_GDEM_Color_Shaded_Relief
    tile_matrix_set: GoogleMapsCompatible_Level12
    date: 2010-01-01
    file_extension: jpg
"#,
        );

        let registry = load_layer_registry(dir.path(), default_epoch());
        assert_eq!(registry.keys(), vec!["relief", "smoke"]);

        let smoke = registry.resolve("smoke").unwrap();
        assert_eq!(smoke.title, "Smoke");
        assert_eq!(smoke.coordinate_system, "3857");
        assert!(smoke.has_rotating_date());

        let relief = registry.resolve("relief").unwrap();
        assert_eq!(relief.date, NaiveDate::from_ymd_opt(2010, 1, 1));
        assert_eq!(relief.file_extension, "jpg");
        assert!(registry.resolve("clouds").is_err());
    }

    #[test]
    fn test_malformed_file_uses_builtins() {
        let dir = tempfile::tempdir().unwrap();
        write_layers(dir.path(), "layers: [not, a, map");
        let registry = load_layer_registry(dir.path(), default_epoch());
        assert!(registry.resolve("clouds").is_ok());
    }

    #[test]
    fn test_empty_file_uses_builtins() {
        let dir = tempfile::tempdir().unwrap();
        write_layers(dir.path(), "layers: {}\n");
        let registry = load_layer_registry(dir.path(), default_epoch());
        assert_eq!(registry.len(), 5);
    }
}
