/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

/// A region of the thematic overlay on the map.
///
/// `value` is the population in thousands and drives the fill color;
/// `area` is in square kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub name: &'static str,
    pub value: u32,
    pub area: u32,
    /// Closed ring, first point repeated last.
    pub ring: &'static [GeoPoint],
}

/// A city marker. `population` is a label in millions, e.g. "12.7".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub position: GeoPoint,
    pub population: &'static str,
}

/// A stylized shape of the region picker diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerShape {
    pub id: &'static str,
    pub name: &'static str,
    /// Absolute SVG path (`M`, `L`, `Z`) in diagram pixels.
    pub path: &'static str,
    pub color: &'static str,
}

/// A labelled dot drawn on the picker backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityDot {
    pub x: i32,
    pub y: i32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    pub x: i32,
    pub y: i32,
    pub color: &'static str,
    pub label: &'static str,
}
