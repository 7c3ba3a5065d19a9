use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::layer::LayerChoice;
use crate::app::domain::messages::Message;

const LAYER_MENU: &str = "Вид/Слой";

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, initial_layer: LayerChoice) {
    let s = sender;

    // File
    menu.add("Файл/Выход", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Quit) });

    // View
    for (i, choice) in LayerChoice::ALL.into_iter().enumerate() {
        let flag = if choice == initial_layer { MenuFlag::Radio | MenuFlag::Value } else { MenuFlag::Radio };
        let shortcut = Shortcut::Ctrl | char::from(b'1' + i as u8);
        menu.add(
            &format!("{}/{}", LAYER_MENU, choice.label()),
            shortcut,
            flag,
            { let s = *s; move |_| s.send(Message::SelectLayer(choice)) },
        );
    }

    // Help
    menu.add("Справка/О программе", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ShowAbout) });
}

/// Keep the radio items in step with layer changes made from the buttons.
pub fn sync_layer_items(menu: &mut MenuBar, active: LayerChoice) {
    for choice in LayerChoice::ALL {
        let path = format!("{}/{}", LAYER_MENU, choice.label());
        if let Some(mut item) = menu.find_item(&path) {
            if choice == active {
                item.set();
            } else {
                item.clear();
            }
        }
    }
}
