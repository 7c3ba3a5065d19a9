//! Controllers layer - interaction state of the two map components.
//!
//! - Map view: active base layer and selected region
//! - Region picker: hover/selection of the diagram and its info panel

pub mod map_view;
pub mod region_picker;
