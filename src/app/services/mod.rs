//! Services layer - pure operations and background work.
//!
//! This module contains the logic the canvases and controllers build on:
//! - Style resolution for overlay regions and picker shapes
//! - Web Mercator projection and the map viewport
//! - SVG path parsing and hit-testing
//! - Clipping of the image overlay to the visible area
//! - Popup contents
//! - Tile URL templates, cache and download workers

pub mod geometry;
pub mod overlay;
pub mod popup;
pub mod projection;
pub mod styling;
pub mod tiles;
