// SensorConsole
// Supplied without warranty.
// Use at your own risk.

// src/main.rs
//
// Control panel for the STM32 water-quality sensor controller: connect over
// serial, send START / RESET / EXIT, and watch classified readings scroll by.

mod app;
mod chart;

use iced::{Size, Task};

use sensor_console::settings::Settings;

use app::SensorConsole;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = Settings::default_path();
    let settings = Settings::load_or_default(&settings_path);
    log::info!("settings from {}", settings_path.display());

    iced::application(SensorConsole::title, SensorConsole::update, SensorConsole::view)
        .subscription(SensorConsole::subscription)
        .theme(SensorConsole::theme)
        .window(iced::window::Settings {
            size: Size::new(960.0, 860.0),
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || (SensorConsole::new(settings, settings_path), Task::none()))
}
