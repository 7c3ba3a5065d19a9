//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Base layer choices and tile sources
//! - Regions, cities and picker shapes, plus the built-in datasets
//! - Application settings
//! - Message types for the event system

pub mod datasets;
pub mod layer;
pub mod messages;
pub mod region;
pub mod settings;

pub use layer::{BaseLayer, ImageOverlay, LayerChoice, TileSource};
pub use messages::Message;
pub use region::{City, GeoBounds, GeoPoint, MapRegion, PickerShape};
pub use settings::AppSettings;
