use tracing::info;

use crate::app::domain::layer::{BaseLayer, LayerChoice};

/// A confirmation the user has to dismiss before the UI continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub text: String,
}

/// Layer and region selection of the map view.
///
/// The hover highlight of overlay regions is not tracked here; it belongs to
/// the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    active_layer: LayerChoice,
    selected_region: Option<String>,
}

impl MapViewState {
    pub fn new(initial_layer: LayerChoice) -> Self {
        Self {
            active_layer: initial_layer,
            selected_region: None,
        }
    }

    pub fn active_layer(&self) -> LayerChoice {
        self.active_layer
    }

    /// The one base layer to draw.
    pub fn base_layer(&self) -> BaseLayer {
        self.active_layer.base_layer()
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }

    pub fn select_layer(&mut self, choice: LayerChoice) {
        if self.active_layer != choice {
            info!(from = ?self.active_layer, to = ?choice, "base layer changed");
        }
        self.active_layer = choice;
    }

    /// Record the selection and return the acknowledgment the caller must
    /// show. Every call yields one, even when the name is unchanged.
    pub fn select_region(&mut self, name: &str) -> Acknowledgment {
        info!(region = name, "region selected on map");
        self.selected_region = Some(name.to_string());
        Acknowledgment {
            text: format!("Вы выбрали регион: {}", name),
        }
    }
}

impl Default for MapViewState {
    fn default() -> Self {
        Self::new(LayerChoice::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = MapViewState::default();
        assert_eq!(state.active_layer(), LayerChoice::RasterStreet);
        assert!(state.selected_region().is_none());
    }

    #[test]
    fn test_exactly_one_base_layer_per_choice() {
        let mut state = MapViewState::default();
        for choice in LayerChoice::ALL {
            state.select_layer(choice);
            assert_eq!(state.active_layer(), choice);
            assert_eq!(state.base_layer(), choice.base_layer());
            for other in LayerChoice::ALL.iter().filter(|c| **c != choice) {
                assert_ne!(state.base_layer(), other.base_layer());
            }
        }
    }

    #[test]
    fn test_select_region_acknowledges_with_name() {
        let mut state = MapViewState::default();
        let ack = state.select_region("Москва");
        assert_eq!(state.selected_region(), Some("Москва"));
        assert!(ack.text.contains("Москва"));
        assert_eq!(ack.text, "Вы выбрали регион: Москва");
    }

    #[test]
    fn test_select_region_overwrites() {
        let mut state = MapViewState::default();
        state.select_region("Москва");
        let ack = state.select_region("Санкт-Петербург");
        assert_eq!(state.selected_region(), Some("Санкт-Петербург"));
        assert!(ack.text.ends_with("Санкт-Петербург"));
    }

    #[test]
    fn test_layer_change_keeps_selection() {
        let mut state = MapViewState::default();
        state.select_region("Москва");
        state.select_layer(LayerChoice::VectorOverlay);
        assert_eq!(state.selected_region(), Some("Москва"));
    }
}
