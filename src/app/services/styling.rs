//! Style resolution for the thematic overlay and the region picker.
//!
//! Everything here is a pure function of the entity and the current
//! interaction state, so the canvases only translate the returned records
//! into draw calls.

use crate::app::domain::region::{MapRegion, PickerShape};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Rgb(out[0], out[1], out[2]))
            }
            6 => Some(Rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Alpha-composite `self` over `under`.
    pub fn over(self, under: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| (top as f32 * a + bottom as f32 * (1.0 - a)).round() as u8;
        Rgb(mix(self.0, under.0), mix(self.1, under.1), mix(self.2, under.2))
    }
}

/// Population color scale, darkest first. Index `i < 7` covers values
/// strictly greater than `VALUE_THRESHOLDS[i]`.
pub const VALUE_COLORS: [&str; 8] = [
    "#800026", "#BD0026", "#E31A1C", "#FC4E2A", "#FD8D3C", "#FEB24C", "#FED976", "#FFEDA0",
];

pub const VALUE_THRESHOLDS: [f64; 7] = [1000.0, 500.0, 200.0, 100.0, 50.0, 20.0, 10.0];

/// Fill color for a region value. Thresholds are exclusive: a value equal to
/// a threshold lands in the lighter bucket below it.
pub fn color_for_value(value: f64) -> &'static str {
    VALUE_THRESHOLDS
        .iter()
        .position(|t| value > *t)
        .map_or(VALUE_COLORS[7], |i| VALUE_COLORS[i])
}

/// Outline and fill parameters of one thematic overlay feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub fill_color: &'static str,
    pub weight: i32,
    pub opacity: f32,
    pub color: &'static str,
    /// Dash length in pixels; `None` draws a solid outline.
    pub dash: Option<i32>,
    pub fill_opacity: f32,
}

/// Resting style of a region polygon.
pub fn region_style(region: &MapRegion) -> OverlayStyle {
    OverlayStyle {
        fill_color: color_for_value(region.value as f64),
        weight: 2,
        opacity: 1.0,
        color: "white",
        dash: Some(3),
        fill_opacity: 0.7,
    }
}

/// Style of a region polygon under the pointer. Only the outline weight,
/// color, dash and fill opacity change.
pub fn region_hover_style(region: &MapRegion) -> OverlayStyle {
    OverlayStyle {
        weight: 3,
        color: "#666",
        dash: None,
        fill_opacity: 0.9,
        ..region_style(region)
    }
}

pub fn overlay_style(region: &MapRegion, hovered: bool) -> OverlayStyle {
    if hovered {
        region_hover_style(region)
    } else {
        region_style(region)
    }
}

/// Named colors used by the styles above.
pub fn named_color(name: &str) -> Option<Rgb> {
    match name {
        "white" => Some(Rgb::WHITE),
        "black" => Some(Rgb(0, 0, 0)),
        other => Rgb::from_hex(other),
    }
}

/// Stroke parameters of a picker shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: i32,
    pub opacity: f32,
}

pub const PICKER_SELECTED_STROKE: &str = "#FF0000";
pub const PICKER_HOVER_STROKE: &str = "#666";
pub const PICKER_DEFAULT_STROKE: &str = "#333";

/// Selection outranks hover; the fill is always the shape's own color.
pub fn picker_style(shape: &PickerShape, selected: bool, hovered: bool) -> ShapeStyle {
    let (stroke, stroke_width, opacity) = if selected {
        (PICKER_SELECTED_STROKE, 3, 0.9)
    } else if hovered {
        (PICKER_HOVER_STROKE, 2, 0.8)
    } else {
        (PICKER_DEFAULT_STROKE, 1, 0.7)
    };
    ShapeStyle {
        fill: shape.color,
        stroke,
        stroke_width,
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::datasets::{MAP_REGIONS, PICKER_SHAPES};

    #[test]
    fn test_color_for_value_extremes() {
        assert_eq!(color_for_value(1500.0), "#800026");
        assert_eq!(color_for_value(0.0), "#FFEDA0");
        assert_eq!(color_for_value(-5.0), "#FFEDA0");
    }

    #[test]
    fn test_color_for_value_boundaries_are_exclusive() {
        assert_eq!(color_for_value(1000.0), "#BD0026");
        assert_eq!(color_for_value(500.0), "#E31A1C");
        assert_eq!(color_for_value(200.0), "#FC4E2A");
        assert_eq!(color_for_value(100.0), "#FD8D3C");
        assert_eq!(color_for_value(50.0), "#FEB24C");
        assert_eq!(color_for_value(20.0), "#FED976");
        assert_eq!(color_for_value(10.0), "#FFEDA0");
        assert_eq!(color_for_value(10.5), "#FED976");
    }

    #[test]
    fn test_color_for_value_has_eight_buckets() {
        let samples = [2000.0, 700.0, 300.0, 150.0, 70.0, 30.0, 15.0, 5.0];
        let colors: Vec<&str> = samples.iter().map(|v| color_for_value(*v)).collect();
        assert_eq!(colors, VALUE_COLORS.to_vec());
    }

    #[test]
    fn test_region_hover_reverts_to_base() {
        let region = &MAP_REGIONS[0];
        let base = region_style(region);
        let hover = region_hover_style(region);
        assert_eq!((base.weight, base.color, base.dash, base.fill_opacity), (2, "white", Some(3), 0.7));
        assert_eq!((hover.weight, hover.color, hover.dash, hover.fill_opacity), (3, "#666", None, 0.9));
        assert_eq!(hover.fill_color, base.fill_color);
        assert_eq!(overlay_style(region, false), base);
    }

    #[test]
    fn test_picker_style_precedence() {
        let shape = &PICKER_SHAPES[0];
        let selected = picker_style(shape, true, true);
        assert_eq!((selected.stroke, selected.stroke_width, selected.opacity), ("#FF0000", 3, 0.9));
        let hovered = picker_style(shape, false, true);
        assert_eq!((hovered.stroke, hovered.stroke_width, hovered.opacity), ("#666", 2, 0.8));
        let idle = picker_style(shape, false, false);
        assert_eq!((idle.stroke, idle.stroke_width, idle.opacity), ("#333", 1, 0.7));
        assert!([selected, hovered, idle].iter().all(|s| s.fill == shape.color));
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#800026"), Some(Rgb(0x80, 0x00, 0x26)));
        assert_eq!(Rgb::from_hex("#666"), Some(Rgb(0x66, 0x66, 0x66)));
        assert_eq!(Rgb::from_hex("f0f8ff"), Some(Rgb(0xf0, 0xf8, 0xff)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(named_color("white"), Some(Rgb::WHITE));
    }

    #[test]
    fn test_rgb_over() {
        let red = Rgb(255, 0, 0);
        assert_eq!(red.over(Rgb::WHITE, 1.0), red);
        assert_eq!(red.over(Rgb::WHITE, 0.0), Rgb::WHITE);
        assert_eq!(Rgb(0, 0, 0).over(Rgb(200, 200, 200), 0.5), Rgb(100, 100, 100));
    }
}
