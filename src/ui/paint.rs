//! Drawing helpers shared by the map and picker canvases.
//!
//! FLTK primitives are opaque, so translucent fills are composited against a
//! known backdrop color before drawing.

use fltk::{
    draw::{self, LineStyle},
    enums::{Align, Color, Font},
};

use crate::app::services::geometry::Point;
use crate::app::services::popup::PopupContent;
use crate::app::services::styling::{Rgb, named_color};

pub fn rgb_to_fltk(c: Rgb) -> Color {
    Color::from_rgb(c.0, c.1, c.2)
}

/// Parse a style color, falling back to black for unknown names.
pub fn style_rgb(name: &str) -> Rgb {
    named_color(name).unwrap_or(Rgb(0, 0, 0))
}

pub fn style_color(name: &str) -> Color {
    rgb_to_fltk(style_rgb(name))
}

/// Composite `name` at `alpha` over `backdrop`.
pub fn translucent(name: &str, alpha: f32, backdrop: Rgb) -> Color {
    rgb_to_fltk(style_rgb(name).over(backdrop, alpha))
}

pub fn fill_polygon(points: &[Point], color: Color) {
    if points.len() < 3 {
        return;
    }
    draw::set_draw_color(color);
    draw::begin_complex_polygon();
    for p in points {
        draw::vertex(p.x, p.y);
    }
    draw::end_complex_polygon();
}

pub fn stroke_ring(points: &[Point], color: Color, width: i32, dashed: bool) {
    if points.len() < 2 || width <= 0 {
        return;
    }
    let style = if dashed { LineStyle::Dash } else { LineStyle::Solid };
    draw::set_draw_color(color);
    draw::set_line_style(style, width);
    draw::begin_loop();
    for p in points {
        draw::vertex(p.x, p.y);
    }
    draw::end_loop();
    draw::set_line_style(LineStyle::Solid, 0);
}

pub fn fill_circle(cx: i32, cy: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    draw::draw_pie(cx - r, cy - r, 2 * r, 2 * r, 0.0, 360.0);
}

pub fn draw_rounded_rect(x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    // Center body
    draw::draw_rectf(x + r, y, w - 2 * r, h);
    // Left strip
    draw::draw_rectf(x, y + r, r, h - 2 * r);
    // Right strip
    draw::draw_rectf(x + w - r, y + r, r, h - 2 * r);
    // Four corners
    draw::draw_pie(x, y, 2 * r, 2 * r, 90.0, 180.0);
    draw::draw_pie(x + w - 2 * r, y, 2 * r, 2 * r, 0.0, 90.0);
    draw::draw_pie(x, y + h - 2 * r, 2 * r, 2 * r, 180.0, 270.0);
    draw::draw_pie(x + w - 2 * r, y + h - 2 * r, 2 * r, 2 * r, 270.0, 360.0);
}

pub const POPUP_PADDING: i32 = 10;
pub const POPUP_CLOSE_SIZE: i32 = 14;
const POPUP_TIP: i32 = 10;
const POPUP_LINE_H: i32 = 18;

/// Screen rectangle of a drawn popup, for hit-testing its close button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PopupRect {
    pub fn contains(&self, mx: i32, my: i32) -> bool {
        mx >= self.x && mx < self.x + self.w && my >= self.y && my < self.y + self.h + POPUP_TIP
    }

    pub fn close_hit(&self, mx: i32, my: i32) -> bool {
        let cx = self.x + self.w - POPUP_CLOSE_SIZE - 4;
        mx >= cx && mx <= cx + POPUP_CLOSE_SIZE && my >= self.y + 4 && my <= self.y + 4 + POPUP_CLOSE_SIZE
    }
}

/// Draw a bubble whose tip points at `(tip_x, tip_y)`.
pub fn draw_popup(content: &PopupContent, tip_x: i32, tip_y: i32) -> PopupRect {
    draw::set_font(Font::HelveticaBold, 16);
    let (title_w, _) = draw::measure(&content.title, true);
    draw::set_font(Font::Helvetica, 12);
    let body_w = content
        .lines
        .iter()
        .map(|l| draw::measure(l, true).0)
        .max()
        .unwrap_or(0);

    let w = title_w.max(body_w) + 2 * POPUP_PADDING + POPUP_CLOSE_SIZE;
    let h = POPUP_LINE_H * (content.lines.len() as i32 + 1) + 2 * POPUP_PADDING + 6;
    let x = tip_x - w / 2;
    let y = tip_y - POPUP_TIP - h;

    // Shadow, body, tip
    draw_rounded_rect(x + 2, y + 2, w, h, 8, Color::from_rgb(160, 160, 160));
    draw_rounded_rect(x, y, w, h, 8, Color::White);
    draw::set_draw_color(Color::White);
    draw::begin_polygon();
    draw::vertex((tip_x - POPUP_TIP) as f64, (y + h) as f64);
    draw::vertex((tip_x + POPUP_TIP) as f64, (y + h) as f64);
    draw::vertex(tip_x as f64, tip_y as f64);
    draw::end_polygon();

    draw::set_draw_color(Color::Black);
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2(
        &content.title,
        x + POPUP_PADDING,
        y + POPUP_PADDING,
        w - 2 * POPUP_PADDING,
        POPUP_LINE_H,
        Align::Left | Align::Inside,
    );

    // Rule under the title
    draw::set_draw_color(Color::from_rgb(200, 200, 200));
    let rule_y = y + POPUP_PADDING + POPUP_LINE_H + 2;
    draw::draw_line(x + POPUP_PADDING, rule_y, x + w - POPUP_PADDING, rule_y);

    draw::set_draw_color(Color::from_rgb(0x66, 0x66, 0x66));
    draw::set_font(Font::Helvetica, 12);
    for (i, line) in content.lines.iter().enumerate() {
        draw::draw_text2(
            line,
            x + POPUP_PADDING,
            rule_y + 4 + i as i32 * POPUP_LINE_H,
            w - 2 * POPUP_PADDING,
            POPUP_LINE_H,
            Align::Left | Align::Inside,
        );
    }

    let rect = PopupRect { x, y, w, h };
    draw::set_draw_color(Color::from_rgb(120, 120, 120));
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2(
        "\u{00d7}",
        x + w - POPUP_CLOSE_SIZE - 4,
        y + 4,
        POPUP_CLOSE_SIZE,
        POPUP_CLOSE_SIZE,
        Align::Center,
    );
    rect
}
