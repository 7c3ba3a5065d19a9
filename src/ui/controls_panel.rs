use fltk::{
    app::Sender,
    button::RadioButton,
    enums::{Align, Color, Font, FrameType},
    frame::Frame,
    group::Flex,
    prelude::*,
};

use crate::app::domain::layer::LayerChoice;
use crate::app::domain::messages::Message;

pub const CONTROLS_HEIGHT: i32 = 90;

/// Layer buttons, the "selected region" block and the status line above the map.
pub struct ControlsPanel {
    pub flex: Flex,
    layer_buttons: Vec<(LayerChoice, RadioButton)>,
    selected_frame: Frame,
    status_frame: Frame,
}

impl ControlsPanel {
    pub fn new(active: LayerChoice, sender: &Sender<Message>) -> Self {
        let mut flex = Flex::default().column();
        flex.set_margin(6);
        flex.set_spacing(4);

        let mut heading = Frame::default().with_label("Выберите слой карты:");
        heading.set_label_font(Font::HelveticaBold);
        heading.set_align(Align::Left | Align::Inside);
        flex.fixed(&heading, 20);

        let mut row = Flex::default().row();
        row.set_spacing(6);
        let layer_buttons: Vec<(LayerChoice, RadioButton)> = LayerChoice::ALL
            .iter()
            .map(|&choice| {
                let mut btn = RadioButton::default().with_label(choice.label());
                btn.set_selection_color(Color::from_rgb(0x3b, 0x82, 0xf6));
                btn.set_callback({
                    let s = *sender;
                    move |_| s.send(Message::SelectLayer(choice))
                });
                row.fixed(&btn, 150);
                (choice, btn)
            })
            .collect();

        let mut selected_frame = Frame::default();
        selected_frame.set_frame(FrameType::FlatBox);
        selected_frame.set_color(Color::from_rgb(0xe8, 0xf4, 0xfd));
        selected_frame.set_align(Align::Left | Align::Inside);
        row.end();
        flex.fixed(&row, 28);

        let mut status_frame = Frame::default();
        status_frame.set_label_size(12);
        status_frame.set_label_color(Color::from_rgb(100, 100, 100));
        status_frame.set_align(Align::Left | Align::Inside);
        flex.fixed(&status_frame, 18);

        flex.end();

        let mut panel = Self {
            flex,
            layer_buttons,
            selected_frame,
            status_frame,
        };
        panel.show_active_layer(active);
        panel.show_selected_region(None);
        panel
    }

    /// Press the button of `active` and release the others.
    pub fn show_active_layer(&mut self, active: LayerChoice) {
        for (choice, btn) in self.layer_buttons.iter_mut() {
            btn.set_value(*choice == active);
        }
    }

    /// The block is only visible while a region is selected.
    pub fn show_selected_region(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                self.selected_frame.set_label(&format!("  Выбранный регион: {}", name));
                self.selected_frame.show();
            }
            None => self.selected_frame.hide(),
        }
        self.flex.redraw();
    }

    pub fn set_status(&mut self, text: &str) {
        self.status_frame.set_label(text);
        self.status_frame.redraw();
    }
}
