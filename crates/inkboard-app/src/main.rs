//! Main application entry point.

use clap::Parser;
use inkboard_app::{App, AppConfig, ShortcutRegistry};

fn main() {
    env_logger::init();
    log::info!("Starting Inkboard");

    let config = AppConfig::parse();

    if config.list_shortcuts {
        ShortcutRegistry::print_all();
        return;
    }

    if let Err(e) = pollster::block_on(App::run(config)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
