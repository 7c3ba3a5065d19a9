//! Web Mercator projection and the viewport of the map canvas.
//!
//! World pixel coordinates follow the slippy-map convention: at zoom `z` the
//! world is `256 * 2^z` pixels wide, x grows east and y grows south.

use std::f64::consts::PI;

use crate::app::domain::region::GeoPoint;
use super::geometry::Point;

pub const TILE_SIZE: u32 = 256;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;
pub const MAX_LAT: f64 = 85.051_128_78;

/// Identifies one raster tile of one tile source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub source: &'static str,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE as f64 * 2f64.powi(zoom as i32)
}

/// Project to world pixels. Longitudes past 180 keep growing east so shapes
/// crossing the antimeridian stay contiguous.
pub fn project(p: GeoPoint, zoom: u8) -> Point {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let x = (p.lon + 180.0) / 360.0 * size;
    let y = (1.0 - lat.tan().asinh() / PI) / 2.0 * size;
    Point::new(x, y)
}

pub fn unproject(world: Point, zoom: u8) -> GeoPoint {
    let size = world_size(zoom);
    let lon = world.x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * world.y / size)).sinh().atan().to_degrees();
    GeoPoint::new(lat, lon)
}

/// A tile that is at least partly visible, with its top-left screen offset
/// relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub z: u8,
    /// Column wrapped into `0..2^z`.
    pub x: u32,
    pub y: u32,
    pub screen_x: i32,
    pub screen_y: i32,
}

impl VisibleTile {
    pub fn key(&self, source: &'static str) -> TileKey {
        TileKey {
            source,
            z: self.z,
            x: self.x,
            y: self.y,
        }
    }
}

/// Center, zoom and pixel size of the map canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: u8, width: i32, height: i32) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// World pixel position of the canvas' top-left corner.
    pub fn world_origin(&self) -> Point {
        let c = project(self.center, self.zoom);
        Point::new(c.x - self.width as f64 / 2.0, c.y - self.height as f64 / 2.0)
    }

    /// Canvas-relative pixel position of a geographic point.
    pub fn to_screen(&self, p: GeoPoint) -> Point {
        let w = project(p, self.zoom);
        let o = self.world_origin();
        Point::new(w.x - o.x, w.y - o.y)
    }

    pub fn to_geo(&self, screen: Point) -> GeoPoint {
        let o = self.world_origin();
        unproject(Point::new(screen.x + o.x, screen.y + o.y), self.zoom)
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Move the view so the content follows a drag of `(dx, dy)` pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let c = project(self.center, self.zoom);
        let size = world_size(self.zoom);
        let y = (c.y - dy).clamp(0.0, size);
        let mut moved = unproject(Point::new(c.x - dx, y), self.zoom);
        moved.lon = (moved.lon + 180.0).rem_euclid(360.0) - 180.0;
        self.center = moved;
    }

    /// Change zoom by `delta` levels keeping the geographic point under
    /// `anchor` fixed on screen. Returns false when already at a limit.
    pub fn zoom_at(&mut self, delta: i32, anchor: Point) -> bool {
        let target = (self.zoom as i32 + delta).clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8;
        if target == self.zoom {
            return false;
        }
        let fixed = self.to_geo(anchor);
        self.zoom = target;
        let now = self.to_screen(fixed);
        self.pan_by(anchor.x - now.x, anchor.y - now.y);
        true
    }

    /// Tiles covering the canvas at the current zoom, row-major.
    pub fn visible_tiles(&self) -> Vec<VisibleTile> {
        let o = self.world_origin();
        let ts = TILE_SIZE as f64;
        let n = 1i64 << self.zoom;

        let first_col = (o.x / ts).floor() as i64;
        let last_col = ((o.x + self.width as f64) / ts).ceil() as i64 - 1;
        let first_row = ((o.y / ts).floor() as i64).max(0);
        let last_row = (((o.y + self.height as f64) / ts).ceil() as i64 - 1).min(n - 1);

        let mut tiles = Vec::new();
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                tiles.push(VisibleTile {
                    z: self.zoom,
                    x: col.rem_euclid(n) as u32,
                    y: row as u32,
                    screen_x: (col as f64 * ts - o.x).round() as i32,
                    screen_y: (row as f64 * ts - o.y).round() as i32,
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_project_origin_is_world_center() {
        let p = project(GeoPoint::new(0.0, 0.0), 3);
        assert!(approx(p.x, 1024.0));
        assert!(approx(p.y, 1024.0));
    }

    #[test]
    fn test_project_round_trip() {
        let moscow = GeoPoint::new(55.7558, 37.6173);
        let back = unproject(project(moscow, 10), 10);
        assert!(approx(back.lat, moscow.lat));
        assert!(approx(back.lon, moscow.lon));
    }

    #[test]
    fn test_project_past_antimeridian_keeps_growing() {
        let a = project(GeoPoint::new(65.0, 179.0), 3);
        let b = project(GeoPoint::new(65.0, 190.0), 3);
        assert!(b.x > a.x);
        assert!(b.x > world_size(3));
    }

    #[test]
    fn test_center_maps_to_canvas_middle() {
        let vp = Viewport::new(GeoPoint::new(61.524, 105.3188), 3, 800, 600);
        let s = vp.to_screen(vp.center);
        assert!(approx(s.x, 400.0));
        assert!(approx(s.y, 300.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 30, 100, 100);
        assert_eq!(vp.zoom, MAX_ZOOM);
        let mut vp = Viewport::new(GeoPoint::new(0.0, 0.0), MIN_ZOOM, 100, 100);
        assert!(!vp.zoom_at(-1, Point::new(50.0, 50.0)));
        assert!(vp.zoom_at(1, Point::new(50.0, 50.0)));
        assert_eq!(vp.zoom, MIN_ZOOM + 1);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut vp = Viewport::new(GeoPoint::new(61.524, 105.3188), 3, 800, 600);
        let anchor = Point::new(200.0, 150.0);
        let before = vp.to_geo(anchor);
        vp.zoom_at(2, anchor);
        let after = vp.to_screen(before);
        assert!((after.x - anchor.x).abs() < 0.5);
        assert!((after.y - anchor.y).abs() < 0.5);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut vp = Viewport::new(GeoPoint::new(60.0, 100.0), 3, 800, 600);
        vp.pan_by(100.0, 0.0);
        assert!(vp.center.lon < 100.0);
        assert!(approx(vp.center.lat, 60.0));
    }

    #[test]
    fn test_visible_tiles_cover_canvas() {
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 1, 512, 512);
        let tiles = vp.visible_tiles();
        assert_eq!(tiles.len(), 4);
        assert_eq!((tiles[0].x, tiles[0].y, tiles[0].screen_x, tiles[0].screen_y), (0, 0, 0, 0));
        assert_eq!((tiles[3].x, tiles[3].y, tiles[3].screen_x, tiles[3].screen_y), (1, 1, 256, 256));
    }

    #[test]
    fn test_visible_tiles_wrap_columns() {
        // A canvas wider than the world repeats columns horizontally.
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 1, 1024, 256);
        let tiles = vp.visible_tiles();
        assert!(tiles.iter().all(|t| t.x < 2));
        assert!(tiles.len() >= 4);
    }

    #[test]
    fn test_tile_key_from_visible_tile() {
        let vp = Viewport::new(GeoPoint::new(61.524, 105.3188), 3, 256, 256);
        let key = vp.visible_tiles()[0].key("osm");
        assert_eq!(key.source, "osm");
        assert_eq!(key.z, 3);
    }
}
