//! Built-in demonstration data: thematic regions, city markers and the
//! shapes and backdrop of the region picker diagram.

use super::region::{City, CityDot, GeoPoint, LegendEntry, MapRegion, PickerShape};

/// Initial map center and zoom.
pub const MAP_CENTER: GeoPoint = GeoPoint::new(61.5240, 105.3188);
pub const MAP_ZOOM: u8 = 3;

/// Axis-aligned closed ring from south-west to north-east corners.
macro_rules! box_ring {
    ($s:expr, $w:expr, $n:expr, $e:expr) => {
        &[
            GeoPoint::new($s, $w),
            GeoPoint::new($s, $e),
            GeoPoint::new($n, $e),
            GeoPoint::new($n, $w),
            GeoPoint::new($s, $w),
        ]
    };
}

pub static MAP_REGIONS: [MapRegion; 5] = [
    MapRegion {
        name: "Москва",
        value: 12678,
        area: 2561,
        ring: box_ring!(55.5, 37.3, 55.9, 37.9),
    },
    MapRegion {
        name: "Санкт-Петербург",
        value: 5398,
        area: 1439,
        ring: box_ring!(59.8, 30.1, 60.1, 30.6),
    },
    MapRegion {
        name: "Московская область",
        value: 7734,
        area: 44300,
        ring: box_ring!(55.1, 36.8, 56.5, 38.8),
    },
    MapRegion {
        name: "Краснодарский край",
        value: 5668,
        area: 75485,
        ring: box_ring!(44.5, 37.5, 46.5, 41.5),
    },
    MapRegion {
        name: "Свердловская область",
        value: 4290,
        area: 194307,
        ring: box_ring!(56.0, 57.0, 59.0, 62.0),
    },
];

#[rustfmt::skip]
pub static MAJOR_CITIES: [City; 10] = [
    City { name: "Москва", position: GeoPoint::new(55.7558, 37.6173), population: "12.7" },
    City { name: "Санкт-Петербург", position: GeoPoint::new(59.9343, 30.3351), population: "5.4" },
    City { name: "Новосибирск", position: GeoPoint::new(55.0084, 82.9357), population: "1.6" },
    City { name: "Екатеринбург", position: GeoPoint::new(56.8389, 60.6057), population: "1.5" },
    City { name: "Казань", position: GeoPoint::new(55.8304, 49.0661), population: "1.3" },
    City { name: "Нижний Новгород", position: GeoPoint::new(56.2965, 43.9361), population: "1.2" },
    City { name: "Челябинск", position: GeoPoint::new(55.1644, 61.4368), population: "1.2" },
    City { name: "Самара", position: GeoPoint::new(53.2415, 50.2212), population: "1.1" },
    City { name: "Омск", position: GeoPoint::new(54.9885, 73.3242), population: "1.1" },
    City { name: "Ростов-на-Дону", position: GeoPoint::new(47.2225, 39.7188), population: "1.1" },
];

/// Size of the picker diagram in its own pixel space.
pub const PICKER_WIDTH: i32 = 800;
pub const PICKER_HEIGHT: i32 = 400;
pub const PICKER_BACKGROUND: &str = "#f0f8ff";

/// Dashed country outline behind the picker shapes.
pub const PICKER_OUTLINE: &str = "M 100,100 L 200,80 L 300,90 L 400,70 L 500,100 L 600,80 L 700,90 L 750,150 L 700,200 L 650,250 L 600,300 L 500,350 L 400,380 L 300,350 L 200,300 L 150,250 L 100,200 Z";

#[rustfmt::skip]
pub static PICKER_SHAPES: [PickerShape; 20] = [
    PickerShape { id: "moscow", name: "Москва", path: "M 250,150 L 260,145 L 265,155 L 255,160 Z", color: "#FF6B6B" },
    PickerShape { id: "spb", name: "Санкт-Петербург", path: "M 200,100 L 210,95 L 215,105 L 205,110 Z", color: "#4ECDC4" },
    PickerShape { id: "moscow-oblast", name: "Московская область", path: "M 240,140 L 270,130 L 280,160 L 250,170 Z", color: "#45B7D1" },
    PickerShape { id: "krasnodar", name: "Краснодарский край", path: "M 150,250 L 180,240 L 190,270 L 160,280 Z", color: "#96CEB4" },
    PickerShape { id: "sverdlovsk", name: "Свердловская область", path: "M 350,120 L 380,110 L 390,140 L 360,150 Z", color: "#FFEAA7" },
    PickerShape { id: "novosibirsk", name: "Новосибирская область", path: "M 400,150 L 430,140 L 440,170 L 410,180 Z", color: "#DDA0DD" },
    PickerShape { id: "irkutsk", name: "Иркутская область", path: "M 450,180 L 480,170 L 490,200 L 460,210 Z", color: "#98D8C8" },
    PickerShape { id: "khabarovsk", name: "Хабаровский край", path: "M 550,120 L 580,110 L 590,140 L 560,150 Z", color: "#F7DC6F" },
    PickerShape { id: "primorsky", name: "Приморский край", path: "M 600,150 L 630,140 L 640,170 L 610,180 Z", color: "#BB8FCE" },
    PickerShape { id: "tatarstan", name: "Татарстан", path: "M 300,200 L 330,190 L 340,220 L 310,230 Z", color: "#85C1E9" },
    PickerShape { id: "bashkortostan", name: "Башкортостан", path: "M 320,180 L 350,170 L 360,200 L 330,210 Z", color: "#F8C471" },
    PickerShape { id: "chelyabinsk", name: "Челябинская область", path: "M 340,160 L 370,150 L 380,180 L 350,190 Z", color: "#82E0AA" },
    PickerShape { id: "omsk", name: "Омская область", path: "M 380,190 L 410,180 L 420,210 L 390,220 Z", color: "#F1948A" },
    PickerShape { id: "tomsk", name: "Томская область", path: "M 420,170 L 450,160 L 460,190 L 430,200 Z", color: "#C39BD3" },
    PickerShape { id: "krasnoyarsk", name: "Красноярский край", path: "M 470,140 L 500,130 L 510,160 L 480,170 Z", color: "#76D7C4" },
    PickerShape { id: "yakutia", name: "Якутия", path: "M 520,80 L 550,70 L 560,100 L 530,110 Z", color: "#F5B041" },
    PickerShape { id: "kamchatka", name: "Камчатский край", path: "M 650,100 L 680,90 L 690,120 L 660,130 Z", color: "#EC7063" },
    PickerShape { id: "sakhalin", name: "Сахалинская область", path: "M 670,150 L 700,140 L 710,170 L 680,180 Z", color: "#AF7AC5" },
    PickerShape { id: "kaliningrad", name: "Калининградская область", path: "M 100,120 L 130,110 L 140,140 L 110,150 Z", color: "#5DADE2" },
    PickerShape { id: "crimea", name: "Крым", path: "M 120,280 L 150,270 L 160,300 L 130,310 Z", color: "#58D68D" },
];

#[rustfmt::skip]
pub static PICKER_CITIES: [CityDot; 8] = [
    CityDot { x: 250, y: 155, label: "Москва" },
    CityDot { x: 210, y: 100, label: "СПб" },
    CityDot { x: 400, y: 155, label: "Новосибирск" },
    CityDot { x: 360, y: 155, label: "Екатеринбург" },
    CityDot { x: 310, y: 205, label: "Казань" },
    CityDot { x: 170, y: 265, label: "Краснодар" },
    CityDot { x: 660, y: 125, label: "Владивосток" },
    CityDot { x: 120, y: 125, label: "Калининград" },
];

#[rustfmt::skip]
pub static PICKER_LEGEND: [LegendEntry; 4] = [
    LegendEntry { x: 30, y: 50, color: "#FF6B6B", label: "Столица" },
    LegendEntry { x: 30, y: 70, color: "#4ECDC4", label: "Города ФО" },
    LegendEntry { x: 110, y: 50, color: "#45B7D1", label: "Области" },
    LegendEntry { x: 110, y: 70, color: "#96CEB4", label: "Края" },
];

pub const PICKER_INSTRUCTIONS: [&str; 4] = [
    "Нажмите на регион для выбора",
    "Наведите курсор для подсветки",
    "Каждый регион имеет свой цвет",
    "Красная обводка - выбранный регион",
];

pub fn picker_shape(id: &str) -> Option<&'static PickerShape> {
    PICKER_SHAPES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rings_are_closed() {
        for region in &MAP_REGIONS {
            assert_eq!(region.ring.first(), region.ring.last(), "{}", region.name);
            assert!(region.ring.len() >= 4);
        }
    }

    #[test]
    fn test_picker_ids_are_unique() {
        for (i, a) in PICKER_SHAPES.iter().enumerate() {
            for b in &PICKER_SHAPES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_picker_shape_lookup() {
        assert_eq!(picker_shape("spb").map(|s| s.name), Some("Санкт-Петербург"));
        assert!(picker_shape("atlantis").is_none());
    }

    #[test]
    fn test_moscow_city_inside_moscow_region() {
        let moscow = &MAP_REGIONS[0];
        let city = &MAJOR_CITIES[0];
        assert_eq!(moscow.name, city.name);
        let sw = moscow.ring[0];
        let ne = moscow.ring[2];
        assert!(city.position.lat > sw.lat && city.position.lat < ne.lat);
        assert!(city.position.lon > sw.lon && city.position.lon < ne.lon);
    }
}
