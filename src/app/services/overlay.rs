//! Placement of the image overlay at any zoom.
//!
//! Past a few zoom levels the projected overlay is far larger than the
//! canvas, so only the slice around the visible area is rasterized. The
//! slice is described in world pixels, which stay put while panning, and the
//! SVG is re-targeted at it by rewriting the `viewBox` of its root element.

use regex_lite::Regex;
use std::sync::OnceLock;

use super::geometry::Point;

/// Integer rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Smallest integer rectangle covering the corners `lo` (top-left) and
    /// `hi` (bottom-right).
    pub fn covering(lo: Point, hi: Point) -> Self {
        let (x, y) = (lo.x.floor() as i64, lo.y.floor() as i64);
        Self::new(x, y, hi.x.ceil() as i64 - x, hi.y.ceil() as i64 - y)
    }

    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }

    pub fn grow(&self, by: i64) -> Self {
        Self::new(self.x - by, self.y - by, self.w + 2 * by, self.h + 2 * by)
    }

    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let (x, y) = (self.x.max(other.x), self.y.max(other.y));
        let (r, b) = (self.right().min(other.right()), self.bottom().min(other.bottom()));
        (r > x && b > y).then(|| PixelRect::new(x, y, r - x, b - y))
    }

    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Slice of `overlay` worth rasterizing for the `visible` area: the visible
/// area grown by a margin, clipped to the overlay. The margin lets small pans
/// reuse the raster. `None` when the overlay is off-screen or the slice would
/// exceed `max_px` on a side.
pub fn raster_window(overlay: PixelRect, visible: PixelRect, max_px: i64) -> Option<PixelRect> {
    let margin = ((max_px - visible.w.max(visible.h)) / 8).max(0);
    let window = visible.grow(margin).intersect(&overlay)?;
    (window.w <= max_px && window.h <= max_px).then_some(window)
}

/// Whether a raster of `window` still covers everything of `overlay` inside
/// `visible`.
pub fn window_covers(window: PixelRect, overlay: PixelRect, visible: PixelRect) -> bool {
    match visible.intersect(&overlay) {
        Some(needed) => window.contains(&needed),
        None => true,
    }
}

/// Part of the image covered by `window`, as fractions of `overlay`:
/// `(x, y, w, h)` with the full image being `(0, 0, 1, 1)`.
pub fn image_fraction(overlay: PixelRect, window: PixelRect) -> (f64, f64, f64, f64) {
    let (ow, oh) = (overlay.w.max(1) as f64, overlay.h.max(1) as f64);
    (
        (window.x - overlay.x) as f64 / ow,
        (window.y - overlay.y) as f64 / oh,
        window.w as f64 / ow,
        window.h as f64 / oh,
    )
}

fn root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<svg\b[^>]*>").expect("static regex is valid"))
}

fn view_box_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\sviewBox="([^"]*)""#).expect("static regex is valid"))
}

fn sizing_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s(?:width|height|viewBox|preserveAspectRatio)="[^"]*""#)
            .expect("static regex is valid")
    })
}

/// Rewrite the root element of `svg` so it renders the `fraction` of its
/// `viewBox` at `out_w`x`out_h` pixels. `None` if the root has no usable
/// `viewBox`.
pub fn crop_svg(
    svg: &str,
    fraction: (f64, f64, f64, f64),
    out_w: i64,
    out_h: i64,
) -> Option<String> {
    let root = root_regex().find(svg)?;
    let caps = view_box_regex().captures(root.as_str())?;
    let vb: Vec<f64> = caps[1]
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    let [vx, vy, vw, vh] = vb[..] else {
        return None;
    };

    let (fx, fy, fw, fh) = fraction;
    let rest = sizing_attr_regex().replace_all(&root.as_str()[4..], "");
    let tag = format!(
        r#"<svg width="{}" height="{}" viewBox="{} {} {} {}" preserveAspectRatio="none"{}"#,
        out_w,
        out_h,
        vx + fx * vw,
        vy + fy * vh,
        fw * vw,
        fh * vh,
        rest
    );
    Some(format!("{}{}{}", &svg[..root.start()], tag, &svg[root.end()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::datasets::MAP_CENTER;
    use crate::app::domain::layer::RUSSIA_OVERLAY;
    use crate::app::domain::region::GeoPoint;
    use crate::app::services::projection::{Viewport, project};

    const MAX: i64 = 4096;

    fn overlay_rect(zoom: u8) -> PixelRect {
        let b = RUSSIA_OVERLAY.bounds;
        let lo = project(GeoPoint::new(b.north_east.lat, b.south_west.lon), zoom);
        let hi = project(GeoPoint::new(b.south_west.lat, b.north_east.lon), zoom);
        PixelRect::covering(lo, hi)
    }

    fn visible_rect(view: &Viewport) -> PixelRect {
        let o = view.world_origin();
        PixelRect::new(
            o.x.floor() as i64,
            o.y.floor() as i64,
            view.width as i64,
            view.height as i64,
        )
    }

    #[test]
    fn test_low_zoom_rasterizes_the_whole_overlay() {
        let overlay = overlay_rect(3);
        let view = Viewport::new(MAP_CENTER, 3, 1100, 600);
        assert_eq!(raster_window(overlay, visible_rect(&view), MAX), Some(overlay));
    }

    #[test]
    fn test_zoom_6_rasterizes_a_clipped_slice() {
        let overlay = overlay_rect(6);
        assert!(overlay.w > MAX);
        let view = Viewport::new(MAP_CENTER, 6, 1100, 600);
        let visible = visible_rect(&view);
        let window = raster_window(overlay, visible, MAX).unwrap();
        assert!(window.w <= MAX && window.h <= MAX);
        assert!(window_covers(window, overlay, visible));
        assert!(overlay.contains(&window));
    }

    #[test]
    fn test_zoom_18_rasterizes_a_clipped_slice() {
        let overlay = overlay_rect(18);
        let view = Viewport::new(GeoPoint::new(55.75, 37.62), 18, 1100, 600);
        let visible = visible_rect(&view);
        let window = raster_window(overlay, visible, MAX).unwrap();
        assert!(window.w <= MAX && window.h <= MAX);
        assert!(window_covers(window, overlay, visible));

        let (fx, fy, fw, fh) = image_fraction(overlay, window);
        assert!(fx > 0.0 && fx < 1.0 && fy > 0.0 && fy < 1.0);
        assert!(fw > 0.0 && fw < 1e-3 && fh > 0.0 && fh < 1e-3);
    }

    #[test]
    fn test_off_screen_overlay_has_no_window() {
        let overlay = PixelRect::new(0, 0, 100, 100);
        let away = PixelRect::new(50_000, 50_000, 100, 100);
        assert_eq!(raster_window(overlay, away, MAX), None);
        assert!(window_covers(PixelRect::new(0, 0, 1, 1), overlay, away));
    }

    #[test]
    fn test_pan_within_margin_reuses_window() {
        let overlay = PixelRect::new(0, 0, 20_000, 20_000);
        let visible = PixelRect::new(5_000, 5_000, 1100, 600);
        let window = raster_window(overlay, visible, MAX).unwrap();
        let panned = PixelRect::new(5_200, 4_900, 1100, 600);
        assert!(window_covers(window, overlay, panned));
        let far = PixelRect::new(9_000, 5_000, 1100, 600);
        assert!(!window_covers(window, overlay, far));
    }

    #[test]
    fn test_crop_svg_rewrites_root_sizing() {
        let svg = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100"><rect width="200" height="100"/></svg>"#;
        let cropped = crop_svg(svg, (0.5, 0.25, 0.25, 0.5), 400, 300).unwrap();
        assert!(cropped.starts_with(r#"<?xml version="1.0"?><svg width="400" height="300" viewBox="100 25 50 50" preserveAspectRatio="none" xmlns="#));
        // Child elements keep their own attributes.
        assert!(cropped.contains(r#"<rect width="200" height="100"/>"#));
        assert_eq!(cropped.matches("viewBox").count(), 1);
    }

    #[test]
    fn test_crop_svg_needs_a_view_box() {
        let full = (0.0, 0.0, 1.0, 1.0);
        assert_eq!(crop_svg(r#"<svg width="10" height="10"></svg>"#, full, 10, 10), None);
        assert_eq!(crop_svg("<g/>", full, 10, 10), None);
    }

    #[test]
    fn test_builtin_overlay_can_be_cropped() {
        assert!(crop_svg(RUSSIA_OVERLAY.svg, (0.1, 0.1, 0.5, 0.5), 800, 600).is_some());
    }
}
