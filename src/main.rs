mod app;
mod config;
mod desktop;
mod ecs;
mod error;
mod input;
mod pet;
mod render;
mod sim;
mod ui;

use config::{config_path, Config, CONFIG_ENV};
use error::AppError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("fifidesk starting up");

    let path = config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let result = Config::load(&path)
        .map_err(AppError::from)
        .and_then(app::run);

    if let Err(e) = result {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
