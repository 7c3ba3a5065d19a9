//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (layers, regions, datasets, settings, messages)
//! - `controllers/` - Interaction state (map view, region picker)
//! - `services/` - Pure operations and background work (styling, projection, tiles)
//! - `infrastructure/` - External integrations (HTTP, logging, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::map_view::{Acknowledgment, MapViewState};
pub use controllers::region_picker::{InfoPanel, RegionPickerState};
pub use domain::{AppSettings, LayerChoice, Message};
pub use infrastructure::error::{AppError, Result};
