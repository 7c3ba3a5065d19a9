use fltk::{dialog, menu::MenuBar, prelude::*, window::Window};
use tracing::{info, warn};

use super::controllers::map_view::MapViewState;
use super::domain::layer::LayerChoice;
use super::domain::messages::Message;
use super::domain::settings::AppSettings;
use crate::ui::controls_panel::ControlsPanel;
use crate::ui::dialogs::about::show_about_dialog;
use crate::ui::main_window::MainWidgets;
use crate::ui::map_canvas::MapCanvas;
use crate::ui::menu::sync_layer_items;
use crate::ui::picker_canvas::PickerCanvas;

/// Everything the dispatch loop in `main` mutates.
pub struct AppState {
    pub map_view: MapViewState,
    pub settings: AppSettings,
    pub window: Window,
    pub menu: MenuBar,
    pub controls: ControlsPanel,
    pub map: MapCanvas,
    pub picker: PickerCanvas,
}

impl AppState {
    pub fn new(widgets: MainWidgets, settings: AppSettings) -> Self {
        let MainWidgets {
            wind,
            menu,
            controls,
            map,
            picker,
        } = widgets;
        Self {
            map_view: MapViewState::new(settings.initial_layer),
            settings,
            window: wind,
            menu,
            controls,
            map,
            picker,
        }
    }

    /// Route one message. Returns `false` when the app should exit.
    pub fn dispatch(&mut self, msg: Message) -> bool {
        match msg {
            Message::SelectLayer(choice) => self.select_layer(choice),
            Message::MapRegionClicked(name) => self.map_region_clicked(&name),
            Message::OpenAttribution => self.open_attribution(),
            Message::PickerRegionSelected(name) => self.picker_region_selected(&name),
            Message::TileLoaded(key, bytes) => self.map.tile_loaded(key, &bytes),
            Message::TileFailed(key) => self.map.tile_failed(key),
            Message::ShowAbout => show_about_dialog(),
            Message::Quit | Message::WindowClose => return false,
        }
        true
    }

    /// Swap the base layer; buttons and menu follow whichever one was used.
    pub fn select_layer(&mut self, choice: LayerChoice) {
        self.map_view.select_layer(choice);
        self.controls.show_active_layer(choice);
        sync_layer_items(&mut self.menu, choice);
        self.map.set_base_layer(self.map_view.base_layer());
    }

    /// Record the selection and block until the user dismisses the
    /// acknowledgment.
    pub fn map_region_clicked(&mut self, name: &str) {
        let ack = self.map_view.select_region(name);
        self.controls.show_selected_region(self.map_view.selected_region());
        dialog::message_default(&ack.text);
    }

    pub fn picker_region_selected(&mut self, name: &str) {
        info!(region = name, "region chosen on the diagram");
        self.controls.set_status(&format!("Схема регионов: {}", name));
    }

    pub fn open_attribution(&mut self) {
        let Some((_, url)) = self.map.base_layer().attribution() else {
            return;
        };
        if let Err(e) = open::that(url) {
            warn!(url, "Could not open browser: {}", e);
            dialog::alert_default(&format!("Не удалось открыть {}", url));
        }
    }
}
