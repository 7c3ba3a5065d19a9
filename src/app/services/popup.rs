//! Popup contents for map features.

use crate::app::domain::region::{City, MapRegion};

/// Title plus body lines, rendered as a bubble above the feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    pub lines: Vec<String>,
}

/// Group digits by thousands with a space, e.g. `12678` -> `12 678`.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

pub fn region_popup(region: &MapRegion) -> PopupContent {
    PopupContent {
        title: region.name.to_string(),
        lines: vec![
            format!("Население: {} тыс.", group_thousands(region.value)),
            format!("Площадь: {} км²", region.area),
        ],
    }
}

pub fn city_popup(city: &City) -> PopupContent {
    PopupContent {
        title: city.name.to_string(),
        lines: vec![format!("Население: {} млн.", city.population)],
    }
}
