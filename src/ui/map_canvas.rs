use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use fltk::{
    app::{self, Sender},
    draw,
    enums::{Align, Color, ColorDepth, Cursor, Event, Font},
    image::{PngImage, RgbImage, SvgImage},
    prelude::*,
    widget::Widget,
};
use tracing::{debug, warn};

use crate::app::domain::datasets::{MAJOR_CITIES, MAP_CENTER, MAP_REGIONS, MAP_ZOOM};
use crate::app::domain::layer::{BaseLayer, ImageOverlay, TileSource};
use crate::app::domain::messages::Message;
use crate::app::domain::region::{GeoBounds, GeoPoint, MapRegion};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::geometry::{Point, bounding_box, point_in_polygon};
use crate::app::services::overlay::{
    PixelRect, crop_svg, image_fraction, raster_window, window_covers,
};
use crate::app::services::popup::{PopupContent, city_popup, region_popup};
use crate::app::services::projection::{TILE_SIZE, TileKey, Viewport, project};
use crate::app::services::styling::{Rgb, overlay_style};
use crate::app::services::tiles::{TileCache, TileFetcher, expand_template};

use super::paint::{self, PopupRect};

pub const MAP_HEIGHT: i32 = 600;

const MARKER_W: i32 = 25;
const MARKER_H: i32 = 41;
const MARKER_ANCHOR: (i32, i32) = (12, 41);
const MARKER_POPUP_ANCHOR: (i32, i32) = (1, -34);
const MARKER_COLOR: Rgb = Rgb(0x2a, 0x81, 0xcb);

const ZOOM_BTN: i32 = 26;
const ZOOM_MARGIN: i32 = 10;
const DRAG_THRESHOLD: i32 = 3;
/// Upper bound for either side of the overlay raster.
const MAX_OVERLAY_PX: i64 = 4096;

const LAND: Rgb = Rgb(242, 239, 233);
const OVERLAY_BACKDROP: Rgb = Rgb(221, 221, 221);
const TILE_PLACEHOLDER: Rgb = Rgb(230, 228, 224);

struct OpenPopup {
    content: PopupContent,
    at: GeoPoint,
    offset: (i32, i32),
}

/// Raster of one slice of the image overlay, in world pixels of `zoom`.
struct RenderedOverlay {
    zoom: u8,
    window: Option<PixelRect>,
    image: Option<RgbImage>,
}

struct Press {
    start: (i32, i32),
    last: (i32, i32),
    dragged: bool,
}

enum Hit {
    PopupClose,
    PopupBody,
    ZoomIn,
    ZoomOut,
    Attribution,
    City(usize),
    Region(usize),
    Nothing,
}

/// Draw order and hover of the overlay regions.
#[derive(Debug, Clone, PartialEq)]
struct RegionLayers {
    /// Indices into `MAP_REGIONS`; the last one is drawn on top.
    order: Vec<usize>,
    hovered: Option<usize>,
}

impl RegionLayers {
    fn new(count: usize) -> Self {
        Self {
            order: (0..count).collect(),
            hovered: None,
        }
    }

    /// Move the hover. A hovered region is raised to the top and stays
    /// there after the pointer leaves. Returns whether anything changed.
    fn hover(&mut self, hovered: Option<usize>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        if let Some(index) = hovered {
            self.order.retain(|&i| i != index);
            self.order.push(index);
        }
        true
    }

    /// Topmost region whose ring (indexed like `MAP_REGIONS`) contains `p`.
    fn topmost_at(&self, rings: &[Vec<Point>], p: Point) -> Option<usize> {
        self.order.iter().rev().copied().find(|&i| {
            let ring = &rings[i];
            let near = bounding_box(ring)
                .is_some_and(|(lo, hi)| p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y);
            near && point_in_polygon(p, ring)
        })
    }
}

struct MapCanvasState {
    viewport: Viewport,
    base: BaseLayer,
    tiles: TileCache<PngImage>,
    fetcher: TileFetcher,
    overlay: Option<RenderedOverlay>,
    layers: RegionLayers,
    popup: Option<OpenPopup>,
    popup_rect: Option<PopupRect>,
    attribution_rect: Option<(i32, i32, i32, i32)>,
    press: Option<Press>,
    scroll_wheel_zoom: bool,
    sender: Sender<Message>,
}

/// Slippy map with the active base layer, the thematic overlay and city
/// markers.
pub struct MapCanvas {
    pub widget: Widget,
    state: Rc<RefCell<MapCanvasState>>,
}

impl MapCanvas {
    pub fn new(
        w: i32,
        base: BaseLayer,
        fetcher: TileFetcher,
        cache_capacity: usize,
        scroll_wheel_zoom: bool,
        sender: Sender<Message>,
    ) -> Self {
        let state = Rc::new(RefCell::new(MapCanvasState {
            viewport: Viewport::new(MAP_CENTER, MAP_ZOOM, w, MAP_HEIGHT),
            base,
            tiles: TileCache::new(cache_capacity),
            fetcher,
            overlay: None,
            layers: RegionLayers::new(MAP_REGIONS.len()),
            popup: None,
            popup_rect: None,
            attribution_rect: None,
            press: None,
            scroll_wheel_zoom,
            sender,
        }));

        let mut widget = Widget::default().with_size(w, MAP_HEIGHT);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let mut st = draw_state.borrow_mut();
            draw_map(wid, &mut st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_map(wid, event, &handle_state));

        Self { widget, state }
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.state.borrow().base
    }

    /// Swap the base layer. Region overlay, markers and any open popup stay.
    pub fn set_base_layer(&mut self, base: BaseLayer) {
        {
            let mut st = self.state.borrow_mut();
            if st.base == base {
                return;
            }
            st.base = base;
            st.overlay = None;
            st.fetcher.retain_visible(&HashSet::new());
        }
        self.widget.redraw();
    }

    /// Decode a finished download on the UI thread and cache it.
    pub fn tile_loaded(&mut self, key: TileKey, bytes: &[u8]) {
        {
            let mut st = self.state.borrow_mut();
            st.fetcher.complete(&key);
            match PngImage::from_data(bytes) {
                Ok(image) => {
                    debug!(?key, pending = st.fetcher.pending(), "tile cached");
                    st.tiles.insert(key, image);
                }
                Err(e) => {
                    warn!(?key, "Could not decode tile: {}", e);
                    st.tiles.mark_failed(key);
                }
            }
        }
        self.widget.redraw();
    }

    pub fn tile_failed(&mut self, key: TileKey) {
        let mut st = self.state.borrow_mut();
        st.fetcher.complete(&key);
        st.tiles.mark_failed(key);
    }
}

// --- Drawing ---

fn draw_map(wid: &Widget, st: &mut MapCanvasState) {
    st.viewport.resize(wid.w(), wid.h());
    draw::push_clip(wid.x(), wid.y(), wid.w(), wid.h());

    match st.base {
        BaseLayer::Tiles(source) => draw_tiles(wid, st, &source),
        BaseLayer::Image(overlay) => draw_image_overlay(wid, st, &overlay),
    }

    for &index in &st.layers.order {
        let region = &MAP_REGIONS[index];
        draw_region(wid, &st.viewport, region, st.layers.hovered == Some(index));
    }

    for city in &MAJOR_CITIES {
        let tip = st.viewport.to_screen(city.position);
        draw_marker(wid.x() + tip.x.round() as i32, wid.y() + tip.y.round() as i32);
    }

    draw_zoom_control(wid);
    st.attribution_rect = draw_attribution(wid, &st.base);

    st.popup_rect = st.popup.as_ref().map(|popup| {
        let anchor = st.viewport.to_screen(popup.at);
        paint::draw_popup(
            &popup.content,
            wid.x() + anchor.x.round() as i32 + popup.offset.0,
            wid.y() + anchor.y.round() as i32 + popup.offset.1,
        )
    });

    draw::pop_clip();
}

fn draw_tiles(wid: &Widget, st: &mut MapCanvasState, source: &TileSource) {
    draw::set_draw_color(paint::rgb_to_fltk(LAND));
    draw::draw_rectf(wid.x(), wid.y(), wid.w(), wid.h());

    let ts = TILE_SIZE as i32;
    let mut visible = HashSet::new();
    for tile in st.viewport.visible_tiles() {
        let (x, y) = (wid.x() + tile.screen_x, wid.y() + tile.screen_y);
        if tile.z > source.max_zoom {
            continue;
        }
        let key = tile.key(source.name);
        visible.insert(key);
        if let Some(image) = st.tiles.get_mut(&key) {
            image.draw(x, y, ts, ts);
            continue;
        }
        draw::set_draw_color(paint::rgb_to_fltk(TILE_PLACEHOLDER));
        draw::draw_rectf(x, y, ts, ts);
        if !st.tiles.is_failed(&key) {
            let url = expand_template(source, tile.z, tile.x, tile.y);
            st.fetcher.request(key, url);
        }
    }
    st.fetcher.retain_visible(&visible);
}

fn draw_image_overlay(wid: &Widget, st: &mut MapCanvasState, overlay: &ImageOverlay) {
    draw::set_draw_color(paint::rgb_to_fltk(OVERLAY_BACKDROP));
    draw::draw_rectf(wid.x(), wid.y(), wid.w(), wid.h());

    let zoom = st.viewport.zoom;
    let placed = overlay_pixels(overlay, zoom);
    let origin = st.viewport.world_origin();
    let visible = PixelRect::new(
        origin.x.floor() as i64,
        origin.y.floor() as i64,
        st.viewport.width as i64,
        st.viewport.height as i64,
    );

    let reusable = st.overlay.as_ref().is_some_and(|r| {
        r.zoom == zoom
            && match r.window {
                Some(window) => window_covers(window, placed, visible),
                None => visible.intersect(&placed).is_none(),
            }
    });
    if !reusable {
        let window = raster_window(placed, visible, MAX_OVERLAY_PX);
        let image = window.and_then(|window| match rasterize_overlay(overlay, placed, window) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("Could not render overlay image: {}", e);
                None
            }
        });
        debug!(zoom, ?window, "overlay rasterized");
        st.overlay = Some(RenderedOverlay { zoom, window, image });
    }

    if let Some(rendered) = st.overlay.as_mut() {
        if let (Some(window), Some(image)) = (rendered.window, rendered.image.as_mut()) {
            image.draw(
                wid.x() + (window.x as f64 - origin.x).round() as i32,
                wid.y() + (window.y as f64 - origin.y).round() as i32,
                window.w as i32,
                window.h as i32,
            );
        }
    }
}

/// World pixel rectangle of the overlay bounds at `zoom`.
fn overlay_pixels(overlay: &ImageOverlay, zoom: u8) -> PixelRect {
    let GeoBounds { south_west, north_east } = overlay.bounds;
    PixelRect::covering(
        project(GeoPoint::new(north_east.lat, south_west.lon), zoom),
        project(GeoPoint::new(south_west.lat, north_east.lon), zoom),
    )
}

/// Rasterize the `window` slice of the SVG with its alpha scaled by the
/// overlay opacity.
fn rasterize_overlay(overlay: &ImageOverlay, placed: PixelRect, window: PixelRect) -> Result<RgbImage> {
    let (w, h) = (window.w as i32, window.h as i32);
    let svg = crop_svg(overlay.svg, image_fraction(placed, window), window.w, window.h)
        .ok_or_else(|| AppError::Image("overlay SVG has no viewBox".to_string()))?;
    let svg = SvgImage::from_data(&svg)?;
    let rgba = svg.copy_sized(w, h).to_rgb()?.convert(ColorDepth::Rgba8)?;
    let (dw, dh) = (rgba.data_w(), rgba.data_h());
    let mut data = rgba.to_rgb_data();
    if data.len() != (dw * dh * 4) as usize {
        return Err(AppError::Image(format!(
            "unexpected overlay buffer size {} for {}x{}",
            data.len(),
            dw,
            dh
        )));
    }
    for px in data.chunks_exact_mut(4) {
        px[3] = (px[3] as f32 * overlay.opacity).round() as u8;
    }
    Ok(RgbImage::new(&data, dw, dh, ColorDepth::Rgba8)?)
}

fn region_screen_ring(wid: &Widget, viewport: &Viewport, region: &MapRegion) -> Vec<Point> {
    region
        .ring
        .iter()
        .map(|p| {
            let s = viewport.to_screen(*p);
            Point::new(wid.x() as f64 + s.x, wid.y() as f64 + s.y)
        })
        .collect()
}

fn draw_region(wid: &Widget, viewport: &Viewport, region: &MapRegion, hovered: bool) {
    let style = overlay_style(region, hovered);
    let ring = region_screen_ring(wid, viewport, region);
    paint::fill_polygon(&ring, paint::translucent(style.fill_color, style.fill_opacity, LAND));
    paint::stroke_ring(
        &ring,
        paint::translucent(style.color, style.opacity, LAND),
        style.weight,
        style.dash.is_some(),
    );
}

fn draw_marker(tip_x: i32, tip_y: i32) {
    let color = paint::rgb_to_fltk(MARKER_COLOR);
    let head_r = MARKER_W / 2;
    let head_cy = tip_y - MARKER_H + head_r;
    paint::fill_circle(tip_x, head_cy, head_r, color);
    draw::set_draw_color(color);
    draw::begin_polygon();
    draw::vertex((tip_x - head_r + 2) as f64, (head_cy + 6) as f64);
    draw::vertex((tip_x + head_r - 2) as f64, (head_cy + 6) as f64);
    draw::vertex(tip_x as f64, tip_y as f64);
    draw::end_polygon();
    paint::fill_circle(tip_x, head_cy, 5, Color::White);
}

fn zoom_buttons(wid: &Widget) -> [(i32, i32); 2] {
    let x = wid.x() + ZOOM_MARGIN;
    let y = wid.y() + ZOOM_MARGIN;
    [(x, y), (x, y + ZOOM_BTN)]
}

fn draw_zoom_control(wid: &Widget) {
    let [plus, minus] = zoom_buttons(wid);
    draw::set_draw_color(Color::White);
    draw::draw_rectf(plus.0, plus.1, ZOOM_BTN, ZOOM_BTN * 2);
    draw::set_draw_color(Color::from_rgb(160, 160, 160));
    draw::draw_rect(plus.0, plus.1, ZOOM_BTN, ZOOM_BTN * 2);
    draw::draw_line(plus.0, minus.1, plus.0 + ZOOM_BTN - 1, minus.1);

    draw::set_draw_color(Color::Black);
    draw::set_font(Font::HelveticaBold, 18);
    draw::draw_text2("+", plus.0, plus.1, ZOOM_BTN, ZOOM_BTN, Align::Center);
    draw::draw_text2("\u{2212}", minus.0, minus.1, ZOOM_BTN, ZOOM_BTN, Align::Center);
}

fn draw_attribution(wid: &Widget, base: &BaseLayer) -> Option<(i32, i32, i32, i32)> {
    let (text, _) = base.attribution()?;
    draw::set_font(Font::Helvetica, 11);
    let (tw, th) = draw::measure(text, true);
    let (w, h) = (tw + 8, th + 4);
    let (x, y) = (wid.x() + wid.w() - w, wid.y() + wid.h() - h);
    draw::set_draw_color(paint::rgb_to_fltk(Rgb(255, 255, 255).over(LAND, 0.8)));
    draw::draw_rectf(x, y, w, h);
    draw::set_draw_color(Color::from_rgb(0x00, 0x78, 0xa8));
    draw::draw_text2(text, x, y, w, h, Align::Center);
    Some((x, y, w, h))
}

// --- Hit testing ---

fn hit_test(wid: &Widget, st: &MapCanvasState, mx: i32, my: i32) -> Hit {
    if let Some(rect) = st.popup_rect {
        if rect.close_hit(mx, my) {
            return Hit::PopupClose;
        }
        if rect.contains(mx, my) {
            return Hit::PopupBody;
        }
    }

    let [plus, minus] = zoom_buttons(wid);
    let in_box = |(bx, by): (i32, i32), bw: i32, bh: i32| mx >= bx && mx < bx + bw && my >= by && my < by + bh;
    if in_box(plus, ZOOM_BTN, ZOOM_BTN) {
        return Hit::ZoomIn;
    }
    if in_box(minus, ZOOM_BTN, ZOOM_BTN) {
        return Hit::ZoomOut;
    }
    if let Some((ax, ay, aw, ah)) = st.attribution_rect {
        if in_box((ax, ay), aw, ah) {
            return Hit::Attribution;
        }
    }

    // Markers sit above the regions; later markers above earlier ones.
    for (i, city) in MAJOR_CITIES.iter().enumerate().rev() {
        let tip = st.viewport.to_screen(city.position);
        let left = wid.x() + tip.x.round() as i32 - MARKER_ANCHOR.0;
        let top = wid.y() + tip.y.round() as i32 - MARKER_ANCHOR.1;
        if in_box((left, top), MARKER_W, MARKER_H) {
            return Hit::City(i);
        }
    }

    region_at(wid, st, mx, my).map_or(Hit::Nothing, Hit::Region)
}

/// Markers, controls and the popup cover the region beneath them.
fn hovered_region(hit: &Hit) -> Option<usize> {
    match hit {
        Hit::Region(i) => Some(*i),
        _ => None,
    }
}

fn region_at(wid: &Widget, st: &MapCanvasState, mx: i32, my: i32) -> Option<usize> {
    let rings: Vec<Vec<Point>> = MAP_REGIONS
        .iter()
        .map(|region| region_screen_ring(wid, &st.viewport, region))
        .collect();
    st.layers.topmost_at(&rings, Point::new(mx as f64, my as f64))
}

// --- Event handling ---

fn set_cursor(wid: &Widget, cursor: Cursor) {
    if let Some(mut win) = wid.window() {
        win.set_cursor(cursor);
    }
}

fn update_hover(wid: &mut Widget, st: &mut MapCanvasState, hovered: Option<usize>) {
    if st.layers.hover(hovered) {
        wid.redraw();
    }
}

fn handle_map(wid: &mut Widget, event: Event, state: &Rc<RefCell<MapCanvasState>>) -> bool {
    let (mx, my) = (app::event_x(), app::event_y());
    match event {
        Event::Enter => true,
        Event::Move => {
            let mut st = state.borrow_mut();
            let hit = hit_test(wid, &st, mx, my);
            let hovered = hovered_region(&hit);
            let pointer = !matches!(hit, Hit::Nothing | Hit::PopupBody);
            update_hover(wid, &mut st, hovered);
            set_cursor(wid, if pointer { Cursor::Hand } else { Cursor::Default });
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            update_hover(wid, &mut st, None);
            set_cursor(wid, Cursor::Default);
            true
        }
        Event::Push if app::event_button() == 1 => {
            state.borrow_mut().press = Some(Press {
                start: (mx, my),
                last: (mx, my),
                dragged: false,
            });
            true
        }
        Event::Drag => {
            let mut guard = state.borrow_mut();
            let st = &mut *guard;
            let Some(press) = st.press.as_mut() else {
                return false;
            };
            if !press.dragged
                && ((mx - press.start.0).abs() > DRAG_THRESHOLD || (my - press.start.1).abs() > DRAG_THRESHOLD)
            {
                press.dragged = true;
                set_cursor(wid, Cursor::Move);
            }
            if press.dragged {
                let (dx, dy) = (mx - press.last.0, my - press.last.1);
                press.last = (mx, my);
                st.viewport.pan_by(dx as f64, dy as f64);
                wid.redraw();
            }
            true
        }
        Event::Released => {
            let press = state.borrow_mut().press.take();
            match press {
                Some(p) if p.dragged => {
                    set_cursor(wid, Cursor::Default);
                    true
                }
                Some(_) => {
                    handle_click(wid, state, mx, my);
                    true
                }
                None => false,
            }
        }
        Event::MouseWheel => {
            let mut st = state.borrow_mut();
            if !st.scroll_wheel_zoom {
                return false;
            }
            let dy = app::event_dy_value();
            if dy == 0 {
                return false;
            }
            let anchor = Point::new((mx - wid.x()) as f64, (my - wid.y()) as f64);
            if st.viewport.zoom_at(if dy < 0 { 1 } else { -1 }, anchor) {
                debug!(zoom = st.viewport.zoom, "map zoomed");
                wid.redraw();
            }
            true
        }
        _ => false,
    }
}

fn handle_click(wid: &mut Widget, state: &Rc<RefCell<MapCanvasState>>, mx: i32, my: i32) {
    let mut st = state.borrow_mut();
    let center = Point::new(wid.w() as f64 / 2.0, wid.h() as f64 / 2.0);
    match hit_test(wid, &st, mx, my) {
        Hit::PopupClose => st.popup = None,
        Hit::PopupBody => return,
        Hit::ZoomIn => {
            st.viewport.zoom_at(1, center);
        }
        Hit::ZoomOut => {
            st.viewport.zoom_at(-1, center);
        }
        Hit::Attribution => {
            let sender = st.sender;
            drop(st);
            sender.send(Message::OpenAttribution);
            return;
        }
        Hit::City(i) => {
            let city = &MAJOR_CITIES[i];
            st.popup = Some(OpenPopup {
                content: city_popup(city),
                at: city.position,
                offset: MARKER_POPUP_ANCHOR,
            });
        }
        Hit::Region(i) => {
            let region = &MAP_REGIONS[i];
            let at = st.viewport.to_geo(Point::new((mx - wid.x()) as f64, (my - wid.y()) as f64));
            st.popup = Some(OpenPopup {
                content: region_popup(region),
                at,
                offset: (0, 0),
            });
            let sender = st.sender;
            drop(st);
            wid.redraw();
            sender.send(Message::MapRegionClicked(region.name.to_string()));
            return;
        }
        Hit::Nothing => st.popup = None,
    }
    drop(st);
    wid.redraw();
}
