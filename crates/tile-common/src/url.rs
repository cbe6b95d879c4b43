//! Remote WMTS tile URL composition.

use crate::layer::LayerDescriptor;
use crate::tile::TileAddress;

/// Default imagery host (NASA GIBS).
pub const DEFAULT_IMAGERY_HOST: &str = "gibs.earthdata.nasa.gov";

/// Builds RESTful WMTS tile URLs against a single imagery host.
///
/// Format:
/// `https://{host}/wmts/epsg{crs}/best/{product}/default/{date}/{matrix_set}/{z}/{y}/{x}.{ext}`
///
/// No component is validated; a malformed input yields a malformed URL and
/// the fetch reports the failure.
#[derive(Debug, Clone)]
pub struct TileUrlBuilder {
    host: String,
}

impl TileUrlBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn build(
        &self,
        coordinate_system: &str,
        product: &str,
        date: &str,
        tile_matrix_set: &str,
        tile: &TileAddress,
        file_extension: &str,
    ) -> String {
        format!(
            "https://{}/wmts/epsg{}/best/{}/default/{}/{}/{}/{}/{}.{}",
            self.host,
            coordinate_system,
            product,
            date,
            tile_matrix_set,
            tile.z,
            tile.y,
            tile.x,
            file_extension
        )
    }

    /// Build the URL for a resolved layer and date.
    pub fn for_layer(&self, layer: &LayerDescriptor, date: &str, tile: &TileAddress) -> String {
        self.build(
            &layer.coordinate_system,
            &layer.product,
            date,
            &layer.tile_matrix_set,
            tile,
            &layer.file_extension,
        )
    }
}

impl Default for TileUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGERY_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_exact_format() {
        let builder = TileUrlBuilder::new("tiles.example.org");
        let url = builder.build(
            "3857",
            "MODIS_Terra_Aerosol",
            "2019-01-02",
            "GoogleMapsCompatible_Level6",
            &TileAddress::new(2, 3, 4),
            "png",
        );
        assert_eq!(
            url,
            "https://tiles.example.org/wmts/epsg3857/best/MODIS_Terra_Aerosol/default/2019-01-02/GoogleMapsCompatible_Level6/4/3/2.png"
        );
    }

    #[test]
    fn test_row_before_column() {
        let url = TileUrlBuilder::default().build("4326", "P", "D", "250m", &TileAddress::new(7, 1, 3), "jpg");
        assert!(url.ends_with("/250m/3/1/7.jpg"));
        assert!(url.starts_with("https://gibs.earthdata.nasa.gov/wmts/epsg4326/"));
    }

    #[test]
    fn test_for_layer_uses_descriptor_fields() {
        let layer = LayerDescriptor::new("Some_Product")
            .with_tile_matrix_set("500m")
            .with_coordinate_system("4326")
            .with_file_extension("jpg");
        let url = TileUrlBuilder::new("h").for_layer(&layer, "2020-02-29", &TileAddress::new(0, 1, 2));
        assert_eq!(
            url,
            "https://h/wmts/epsg4326/best/Some_Product/default/2020-02-29/500m/2/1/0.jpg"
        );
    }
}
