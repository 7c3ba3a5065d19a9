use fltk::{
    app::Sender,
    group::{Flex, Group, Tabs},
    menu::MenuBar,
    prelude::*,
    window::Window,
};

use crate::app::controllers::region_picker::SelectionNotifier;
use crate::app::domain::datasets::PICKER_WIDTH;
use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::services::tiles::TileFetcher;
use super::controls_panel::{CONTROLS_HEIGHT, ControlsPanel};
use super::map_canvas::{MAP_HEIGHT, MapCanvas};
use super::picker_canvas::{InfoPanelView, PickerCanvas};

const MENU_HEIGHT: i32 = 30;
const TAB_HEADER: i32 = 25;
const WIN_W: i32 = 1100;
const WIN_H: i32 = MENU_HEIGHT + CONTROLS_HEIGHT + TAB_HEADER + MAP_HEIGHT;

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    pub controls: ControlsPanel,
    pub map: MapCanvas,
    pub picker: PickerCanvas,
}

pub fn build_main_window(settings: &AppSettings, fetcher: TileFetcher, sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, WIN_W, WIN_H, "Карта России");
    wind.set_xclass("RussiaMap");

    let mut flex = Flex::new(0, 0, WIN_W, WIN_H, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    let controls = ControlsPanel::new(settings.initial_layer, sender);
    flex.fixed(&controls.flex, CONTROLS_HEIGHT);

    let tabs_y = MENU_HEIGHT + CONTROLS_HEIGHT;
    let tabs = Tabs::new(0, tabs_y, WIN_W, WIN_H - tabs_y, None);
    let (page_y, page_h) = (tabs_y + TAB_HEADER, WIN_H - tabs_y - TAB_HEADER);

    // Map page
    let map_page = Group::new(0, page_y, WIN_W, page_h, "Карта");
    let mut map_flex = Flex::new(0, page_y, WIN_W, page_h, None);
    map_flex.set_type(fltk::group::FlexType::Column);
    let map = MapCanvas::new(
        WIN_W,
        settings.initial_layer.base_layer(),
        fetcher,
        settings.tile_cache_capacity,
        settings.scroll_wheel_zoom,
        *sender,
    );
    map_flex.end();
    map_page.end();

    // Region picker page
    let picker_page = Group::new(0, page_y, WIN_W, page_h, "Схема регионов");
    let mut picker_row = Flex::new(0, page_y, WIN_W, page_h, None);
    picker_row.set_type(fltk::group::FlexType::Row);

    // The info column is built first so the canvas can refresh it; it is
    // moved to the right of the canvas below.
    let mut info_col = Flex::default().column();
    info_col.set_margin(10);
    let panel = InfoPanelView::new(&mut info_col);
    info_col.end();

    let notifier: SelectionNotifier = {
        let s = *sender;
        Box::new(move |name: &str| s.send(Message::PickerRegionSelected(name.to_string())))
    };
    let picker = PickerCanvas::new(panel, Some(notifier));
    picker_row.fixed(&picker.widget, PICKER_WIDTH);
    picker_row.insert(&picker.widget, 0);
    picker_row.end();
    picker_page.end();

    tabs.end();
    flex.end();
    wind.end();
    wind.resizable(&flex);
    wind.size_range(800, WIN_H, 0, 0);

    MainWidgets {
        wind,
        menu,
        controls,
        map,
        picker,
    }
}
