use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app,
    draw,
    enums::{Align, Color, Cursor, Event, Font, FrameType},
    frame::Frame,
    group::Flex,
    prelude::*,
    widget::Widget,
};
use tracing::warn;

use crate::app::controllers::region_picker::{InfoPanel, RegionPickerState, SelectionNotifier};
use crate::app::domain::datasets::{
    PICKER_BACKGROUND, PICKER_CITIES, PICKER_HEIGHT, PICKER_INSTRUCTIONS, PICKER_LEGEND, PICKER_OUTLINE,
    PICKER_WIDTH,
};
use crate::app::services::geometry::{Point, parse_svg_path, point_in_polygon};

use super::paint;

const LEGEND_BOX: (i32, i32, i32, i32) = (10, 10, 180, 80);
const PANEL_HINT: &str = "Нажмите на другие регионы для получения информации";

/// Labels of the side panel next to the diagram.
#[derive(Clone)]
pub struct InfoPanelView {
    pub name: Frame,
    pub swatch: Frame,
    pub hint: Frame,
}

impl InfoPanelView {
    /// Build the panel into `col`; hidden until something is selected.
    pub fn new(col: &mut Flex) -> Self {
        let mut name = Frame::default();
        name.set_label_font(Font::HelveticaBold);
        name.set_label_size(18);
        name.set_align(Align::Left | Align::Inside | Align::Wrap);
        col.fixed(&name, 30);

        let mut swatch = Frame::default();
        swatch.set_frame(FrameType::FlatBox);
        col.fixed(&swatch, 20);

        let mut hint = Frame::default().with_label(PANEL_HINT);
        hint.set_label_size(12);
        hint.set_align(Align::Left | Align::Inside | Align::Wrap);
        col.fixed(&hint, 40);

        let mut instructions = Frame::default().with_label(&instructions_text());
        instructions.set_label_size(12);
        instructions.set_align(Align::Left | Align::Top | Align::Inside | Align::Wrap);

        let mut view = Self { name, swatch, hint };
        view.refresh(None);
        view
    }

    pub fn refresh(&mut self, info: Option<InfoPanel>) {
        match info {
            Some(info) => {
                self.name.set_label(info.name);
                self.swatch.set_color(paint::style_color(info.swatch));
                self.name.show();
                self.swatch.show();
                self.hint.show();
            }
            None => {
                self.name.hide();
                self.swatch.hide();
                self.hint.hide();
            }
        }
        self.swatch.redraw();
        if let Some(mut parent) = self.name.parent() {
            parent.redraw();
        }
    }
}

fn instructions_text() -> String {
    let mut text = String::from("Инструкция:\n");
    for line in PICKER_INSTRUCTIONS {
        text.push_str("\u{2022} ");
        text.push_str(line);
        text.push('\n');
    }
    text
}

struct PickerCanvasState {
    picker: RegionPickerState,
    /// Parsed ring per entry of `picker.shapes()`, in draw order.
    rings: Vec<(&'static str, Vec<Point>)>,
    outline: Vec<Point>,
    panel: InfoPanelView,
}

/// The hand-drawn region diagram, scaled to fit its widget.
pub struct PickerCanvas {
    pub widget: Widget,
}

impl PickerCanvas {
    pub fn new(panel: InfoPanelView, notifier: Option<SelectionNotifier>) -> Self {
        let picker = RegionPickerState::new(notifier);
        let rings = picker
            .shapes()
            .iter()
            .filter_map(|shape| match parse_svg_path(shape.path) {
                Ok(ring) => Some((shape.id, ring)),
                Err(e) => {
                    warn!(id = shape.id, "Skipping picker shape: {}", e);
                    None
                }
            })
            .collect();
        let outline = parse_svg_path(PICKER_OUTLINE).unwrap_or_else(|e| {
            warn!("Picker outline not drawn: {}", e);
            Vec::new()
        });

        let state = Rc::new(RefCell::new(PickerCanvasState {
            picker,
            rings,
            outline,
            panel,
        }));

        let mut widget = Widget::default().with_size(PICKER_WIDTH, PICKER_HEIGHT);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_picker(wid, &st);
        });

        let handle_state = state;
        widget.handle(move |wid, event| handle_picker(wid, event, &handle_state));

        Self { widget }
    }
}

/// Scale and offset that fit the diagram into the widget, centered.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    scale: f64,
    ox: f64,
    oy: f64,
}

impl Fit {
    fn for_rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        let scale = (w as f64 / PICKER_WIDTH as f64)
            .min(h as f64 / PICKER_HEIGHT as f64)
            .max(0.01);
        Self {
            scale,
            ox: x as f64 + (w as f64 - PICKER_WIDTH as f64 * scale) / 2.0,
            oy: y as f64 + (h as f64 - PICKER_HEIGHT as f64 * scale) / 2.0,
        }
    }

    fn of(wid: &Widget) -> Self {
        Self::for_rect(wid.x(), wid.y(), wid.w(), wid.h())
    }

    fn to_screen(&self, p: Point) -> Point {
        Point::new(self.ox + p.x * self.scale, self.oy + p.y * self.scale)
    }

    fn to_diagram(&self, x: i32, y: i32) -> Point {
        Point::new((x as f64 - self.ox) / self.scale, (y as f64 - self.oy) / self.scale)
    }

    fn px(&self, v: i32) -> i32 {
        (v as f64 * self.scale).round() as i32
    }

    fn at(&self, x: i32, y: i32) -> (i32, i32) {
        let p = self.to_screen(Point::new(x as f64, y as f64));
        (p.x.round() as i32, p.y.round() as i32)
    }
}

// --- Drawing ---

fn draw_picker(wid: &Widget, st: &PickerCanvasState) {
    let fit = Fit::of(wid);
    let bg = paint::style_rgb(PICKER_BACKGROUND);

    draw::push_clip(wid.x(), wid.y(), wid.w(), wid.h());
    draw::set_draw_color(wid.parent().map_or(Color::Background, |p| p.color()));
    draw::draw_rectf(wid.x(), wid.y(), wid.w(), wid.h());

    let (x0, y0) = fit.at(0, 0);
    draw::set_draw_color(paint::rgb_to_fltk(bg));
    draw::draw_rectf(x0, y0, fit.px(PICKER_WIDTH), fit.px(PICKER_HEIGHT));

    let outline: Vec<Point> = st.outline.iter().map(|p| fit.to_screen(*p)).collect();
    paint::stroke_ring(&outline, paint::style_color("#333"), 2, true);

    for (id, ring) in &st.rings {
        let Some(style) = st.picker.style_of(id) else {
            continue;
        };
        let screen: Vec<Point> = ring.iter().map(|p| fit.to_screen(*p)).collect();
        // Element opacity applies to fill and stroke alike.
        paint::fill_polygon(&screen, paint::translucent(style.fill, style.opacity, bg));
        paint::stroke_ring(
            &screen,
            paint::translucent(style.stroke, style.opacity, bg),
            style.stroke_width,
            false,
        );
    }

    draw::set_font(Font::Helvetica, fit.px(10).max(6));
    for dot in &PICKER_CITIES {
        let (cx, cy) = fit.at(dot.x, dot.y);
        paint::fill_circle(cx, cy, fit.px(4).max(2), paint::style_color("#333"));
        let (tx, ty) = fit.at(dot.x + 10, dot.y);
        draw::set_draw_color(paint::style_color("#333"));
        draw::draw_text(dot.label, tx, ty);
    }

    draw_legend(&fit);
    draw::pop_clip();
}

fn draw_legend(fit: &Fit) {
    let (lx, ly, lw, lh) = LEGEND_BOX;
    let (x, y) = fit.at(lx, ly);
    let (w, h) = (fit.px(lw), fit.px(lh));
    paint::draw_rounded_rect(x, y, w, h, fit.px(5).max(1), Color::White);
    draw::set_draw_color(paint::style_color("#ccc"));
    draw::draw_rect(x, y, w, h);

    draw::set_draw_color(paint::style_color("#333"));
    draw::set_font(Font::HelveticaBold, fit.px(12).max(6));
    let (tx, ty) = fit.at(lx + 10, ly + 20);
    draw::draw_text("Легенда:", tx, ty);

    draw::set_font(Font::Helvetica, fit.px(10).max(6));
    for entry in &PICKER_LEGEND {
        let (cx, cy) = fit.at(entry.x, entry.y);
        paint::fill_circle(cx, cy, fit.px(6).max(2), paint::style_color(entry.color));
        let (tx, ty) = fit.at(entry.x + 15, entry.y + 5);
        draw::set_draw_color(paint::style_color("#333"));
        draw::draw_text(entry.label, tx, ty);
    }
}

// --- Event handling ---

/// Topmost shape under the pointer; later shapes are painted above earlier ones.
fn shape_at(st: &PickerCanvasState, p: Point) -> Option<&'static str> {
    st.rings
        .iter()
        .rev()
        .find(|(_, ring)| point_in_polygon(p, ring))
        .map(|(id, _)| *id)
}

fn handle_picker(wid: &mut Widget, event: Event, state: &Rc<RefCell<PickerCanvasState>>) -> bool {
    let p = Fit::of(wid).to_diagram(app::event_x(), app::event_y());
    match event {
        Event::Enter => true,
        Event::Move => {
            let mut st = state.borrow_mut();
            let under = shape_at(&st, p);
            if under != st.picker.hovered() {
                match under {
                    Some(id) => st.picker.hover(id),
                    None => st.picker.unhover(),
                }
                wid.redraw();
            }
            if let Some(mut win) = wid.window() {
                win.set_cursor(if under.is_some() { Cursor::Hand } else { Cursor::Default });
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            if st.picker.hovered().is_some() {
                st.picker.unhover();
                wid.redraw();
            }
            if let Some(mut win) = wid.window() {
                win.set_cursor(Cursor::Default);
            }
            true
        }
        Event::Push if app::event_button() == 1 => {
            let mut guard = state.borrow_mut();
            let st = &mut *guard;
            let Some(id) = shape_at(st, p) else {
                return false;
            };
            st.picker.select(id);
            st.panel.refresh(st.picker.info_panel());
            wid.redraw();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_centers_diagram() {
        let fit = Fit::for_rect(0, 0, 1000, 400);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.to_screen(Point::new(0.0, 0.0)), Point::new(100.0, 0.0));
        assert_eq!(fit.to_diagram(500, 200), Point::new(400.0, 200.0));
    }

    #[test]
    fn test_fit_scales_down() {
        let fit = Fit::for_rect(10, 20, 400, 400);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.at(800, 400), (410, 320));
        assert_eq!(fit.px(10), 5);
    }

    #[test]
    fn test_instructions_text() {
        let text = instructions_text();
        assert!(text.starts_with("Инструкция:\n"));
        assert_eq!(text.lines().count(), 5);
    }
}
