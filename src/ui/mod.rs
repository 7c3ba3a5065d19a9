pub mod controls_panel;
pub mod dialogs;
pub mod main_window;
pub mod map_canvas;
pub mod menu;
pub mod paint;
pub mod picker_canvas;
