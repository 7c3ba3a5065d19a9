use serde::{Deserialize, Serialize};

use super::region::{GeoBounds, GeoPoint};

/// Embedded SVG used by the vector overlay layer.
pub const RUSSIA_OVERLAY_SVG: &str = include_str!("../../../assets/russia-map.svg");

/// Which base layer the map shows. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayerChoice {
    #[default]
    RasterStreet,
    RasterTopographic,
    VectorOverlay,
}

impl LayerChoice {
    pub const ALL: [LayerChoice; 3] = [
        LayerChoice::RasterStreet,
        LayerChoice::RasterTopographic,
        LayerChoice::VectorOverlay,
    ];

    /// Button caption in the controls panel.
    pub fn label(&self) -> &'static str {
        match self {
            LayerChoice::RasterStreet => "OpenStreetMap",
            LayerChoice::RasterTopographic => "Топографический",
            LayerChoice::VectorOverlay => "SVG Карта",
        }
    }

    pub fn base_layer(&self) -> BaseLayer {
        match self {
            LayerChoice::RasterStreet => BaseLayer::Tiles(STREET_TILES),
            LayerChoice::RasterTopographic => BaseLayer::Tiles(TOPO_TILES),
            LayerChoice::VectorOverlay => BaseLayer::Image(RUSSIA_OVERLAY),
        }
    }
}

/// A raster tile service addressed by `{s}`, `{z}`, `{x}` and `{y}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSource {
    pub name: &'static str,
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
    pub attribution: &'static str,
    pub attribution_url: &'static str,
    pub max_zoom: u8,
}

/// A single image stretched over a geographic box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOverlay {
    pub svg: &'static str,
    pub bounds: GeoBounds,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseLayer {
    Tiles(TileSource),
    Image(ImageOverlay),
}

impl BaseLayer {
    pub fn attribution(&self) -> Option<(&'static str, &'static str)> {
        match self {
            BaseLayer::Tiles(src) => Some((src.attribution, src.attribution_url)),
            BaseLayer::Image(_) => None,
        }
    }
}

pub const STREET_TILES: TileSource = TileSource {
    name: "osm",
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    subdomains: &["a", "b", "c"],
    attribution: "\u{a9} OpenStreetMap contributors",
    attribution_url: "https://www.openstreetmap.org/copyright",
    max_zoom: 19,
};

pub const TOPO_TILES: TileSource = TileSource {
    name: "topo",
    url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    subdomains: &["a", "b", "c"],
    attribution: "Map data: \u{a9} OpenStreetMap contributors, SRTM | Map style: \u{a9} OpenTopoMap (CC-BY-SA)",
    attribution_url: "https://opentopomap.org",
    max_zoom: 17,
};

pub const RUSSIA_OVERLAY: ImageOverlay = ImageOverlay {
    svg: RUSSIA_OVERLAY_SVG,
    bounds: GeoBounds {
        south_west: GeoPoint::new(41.0, 19.0),
        north_east: GeoPoint::new(82.0, 190.0),
    },
    opacity: 0.8,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_street() {
        assert_eq!(LayerChoice::default(), LayerChoice::RasterStreet);
    }

    #[test]
    fn test_each_choice_has_distinct_base_layer() {
        let layers: Vec<BaseLayer> = LayerChoice::ALL.iter().map(|c| c.base_layer()).collect();
        for (i, a) in layers.iter().enumerate() {
            for b in &layers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_overlay_has_no_attribution() {
        assert!(LayerChoice::VectorOverlay.base_layer().attribution().is_none());
        let (text, url) = LayerChoice::RasterStreet.base_layer().attribution().unwrap();
        assert!(text.contains("OpenStreetMap"));
        assert!(url.starts_with("https://"));
    }

    #[test]
    fn test_overlay_svg_is_embedded() {
        assert!(RUSSIA_OVERLAY.svg.contains("<svg"));
        assert_eq!(RUSSIA_OVERLAY.opacity, 0.8);
    }

    #[test]
    fn test_layer_choice_serialization() {
        let json = serde_json::to_string(&LayerChoice::RasterTopographic).unwrap();
        assert_eq!(json, "\"RasterTopographic\"");
    }
}
