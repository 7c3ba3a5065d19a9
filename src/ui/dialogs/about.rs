use fltk::{
    button::Button,
    enums::{Align, Color, Font},
    frame::Frame,
    group::Flex,
    prelude::*,
    window::Window,
};
use tracing::warn;

use super::run_dialog;
use crate::app::domain::layer::{STREET_TILES, TOPO_TILES};

/// Show About dialog
pub fn show_about_dialog() {
    let version = env!("CARGO_PKG_VERSION");
    let mut dialog = Window::default()
        .with_size(450, 340)
        .with_label("О программе")
        .center_screen();
    dialog.make_modal(true);

    let mut flex = Flex::new(10, 10, 430, 320, None);
    flex.set_type(fltk::group::FlexType::Column);
    flex.set_spacing(10);

    let mut title = Frame::default();
    title.set_label("Карта России");
    title.set_label_size(24);
    title.set_label_font(Font::HelveticaBold);
    flex.fixed(&title, 40);

    let mut version_frame = Frame::default();
    version_frame.set_label(&format!("Версия {}", version));
    version_frame.set_label_size(14);
    flex.fixed(&version_frame, 25);

    let mut desc_frame = Frame::default();
    desc_frame.set_label("Интерактивная карта с выбором слоёв и регионов");
    desc_frame.set_label_size(12);
    desc_frame.set_label_color(Color::from_rgb(100, 100, 100));
    flex.fixed(&desc_frame, 25);

    // Tile credits
    let info_text = format!(
        "Картографические данные:\n{}\n{}\n\n\
         Данные регионов и городов носят демонстрационный характер",
        STREET_TILES.attribution, TOPO_TILES.attribution
    );
    let mut info_frame = Frame::default();
    info_frame.set_label(&info_text);
    info_frame.set_label_size(11);
    info_frame.set_align(Align::Center | Align::Inside | Align::Wrap);

    let mut osm_btn = Button::default().with_label("openstreetmap.org/copyright");
    flex.fixed(&osm_btn, 30);

    let mut close_btn = Button::default().with_label("Закрыть");
    flex.fixed(&close_btn, 35);

    flex.end();
    dialog.end();

    osm_btn.set_callback(|_| {
        if let Err(e) = open::that(STREET_TILES.attribution_url) {
            warn!("Could not open browser: {}", e);
        }
    });

    let mut dialog_close = dialog.clone();
    close_btn.set_callback(move |_| {
        dialog_close.hide();
    });

    dialog.show();
    run_dialog(&dialog);
}
