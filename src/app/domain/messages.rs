use super::layer::LayerChoice;
use crate::app::services::projection::TileKey;

/// All messages that can be sent through the FLTK channel.
/// Widgets, menu callbacks and tile workers send these; the dispatch loop in
/// main hands them to `AppState`.
#[derive(Debug, Clone)]
pub enum Message {
    // Map view
    SelectLayer(LayerChoice),
    MapRegionClicked(String),
    OpenAttribution,

    // Region picker
    PickerRegionSelected(String),

    // Tile workers
    TileLoaded(TileKey, Vec<u8>),
    TileFailed(TileKey),

    // Help / window
    ShowAbout,
    Quit,
    WindowClose,
}
