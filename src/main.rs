#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::{Arc, Mutex};

use fltk::{app, enums::Event, prelude::*};
use tracing::info;

use russia_map::app::domain::messages::Message;
use russia_map::app::domain::settings::AppSettings;
use russia_map::app::infrastructure::http::MinreqClient;
use russia_map::app::infrastructure::logging;
use russia_map::app::services::tiles::{TileFetcher, TileSink};
use russia_map::app::state::AppState;
use russia_map::ui::main_window::build_main_window;
use russia_map::ui::menu::build_menu;

fn main() {
    let settings = AppSettings::load();
    logging::init(&settings.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), layer = ?settings.initial_layer, "starting");

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    // Workers run off the UI thread and post back through the same channel.
    let sink: TileSink = {
        let s = Mutex::new(sender);
        Arc::new(move |msg| {
            if let Ok(s) = s.lock() {
                s.send(msg);
            }
        })
    };
    let client = MinreqClient::new(settings.tile_user_agent.clone(), settings.http_timeout_secs);
    let fetcher = TileFetcher::new(Arc::new(client), settings.tile_workers, sink);

    let mut widgets = build_main_window(&settings, fetcher, &sender);
    build_menu(&mut widgets.menu, &sender, settings.initial_layer);

    widgets.wind.set_callback({
        let s = sender;
        move |_| {
            if app::event() == Event::Close {
                s.send(Message::WindowClose);
            }
        }
    });

    let mut state = AppState::new(widgets, settings);
    state.window.show();

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            if !state.dispatch(msg) {
                state.window.hide();
                app::quit();
                break;
            }
        }
    }
    info!("exiting");
}
