//! Planar geometry helpers shared by both canvases: a parser for the small
//! SVG path subset the picker uses, hit-testing and bounding boxes.

use regex_lite::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("unsupported path command '{0}'")]
    UnsupportedCommand(char),

    #[error("path must start with a move command")]
    MissingMove,

    #[error("coordinate pair expected after '{0}'")]
    MissingCoordinate(char),

    #[error("unexpected text in path: {0:?}")]
    Garbage(String),
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z])|(-?\d+(?:\.\d+)?)|([,\s]+)|(.)").expect("static regex is valid")
    })
}

/// Parse an absolute path made of `M`, `L` and `Z` into a single ring.
///
/// `Z` is accepted but the returned ring is not re-closed; callers treat the
/// last vertex as connected to the first.
pub fn parse_svg_path(d: &str) -> Result<Vec<Point>, PathError> {
    let mut numbers: Vec<f64> = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut command: Option<char> = None;

    let flush = |cmd: Option<char>, numbers: &mut Vec<f64>, ring: &mut Vec<Point>| -> Result<(), PathError> {
        let Some(c) = cmd else {
            return if numbers.is_empty() { Ok(()) } else { Err(PathError::MissingMove) };
        };
        if c == 'Z' {
            return Ok(());
        }
        if numbers.is_empty() || numbers.len() % 2 != 0 {
            return Err(PathError::MissingCoordinate(c));
        }
        if c == 'L' && ring.is_empty() {
            return Err(PathError::MissingMove);
        }
        ring.extend(numbers.chunks(2).map(|p| Point::new(p[0], p[1])));
        numbers.clear();
        Ok(())
    };

    for caps in token_regex().captures_iter(d) {
        if let Some(cmd) = caps.get(1) {
            let c = cmd.as_str().chars().next().unwrap_or('?');
            flush(command, &mut numbers, &mut ring)?;
            match c {
                'M' | 'L' | 'Z' => command = Some(c),
                'z' => command = Some('Z'),
                other => return Err(PathError::UnsupportedCommand(other)),
            }
        } else if let Some(num) = caps.get(2) {
            // The regex only matches valid decimal literals here.
            let value: f64 = num.as_str().parse().map_err(|_| PathError::Garbage(num.as_str().to_string()))?;
            numbers.push(value);
        } else if let Some(junk) = caps.get(4) {
            return Err(PathError::Garbage(junk.as_str().to_string()));
        }
    }
    flush(command, &mut numbers, &mut ring)?;

    if ring.is_empty() {
        return Err(PathError::MissingMove);
    }
    Ok(ring)
}

/// Even-odd ray casting. Points exactly on an edge may fall either way.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounds as `(min, max)`; used to skip exact tests early.
pub fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}
