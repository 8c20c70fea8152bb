//! gamelay -- overlay engine entry point.
//!
//! Loads the service configuration and sets up logging. The native hook
//! module embeds the library and drives `Engine` itself.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gamelay::platform;
use gamelay::Config;

const DEFAULT_CONFIG: &str = "gamelay.toml";

fn main() -> ExitCode {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gamelay: {e}");
            return ExitCode::FAILURE;
        }
    };

    let default_level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    log::info!("gamelay v{}", env!("CARGO_PKG_VERSION"));
    for hook in &config.hooks {
        log::info!("hook {} matches \"{}\"", hook.id, hook.window_name);
    }
    log::info!(
        "injection poll {:?}, exit poll {:?}, on failure {:?}",
        config.watcher.period(),
        config.exit_watch.period(),
        config.injection.on_failure
    );

    if let Err(e) = platform::create_process_probe() {
        log::warn!("{e}");
    }
    if let Err(e) = platform::create_display_scale() {
        log::warn!("{e}");
    }
    ExitCode::SUCCESS
}

/// A missing default file is not an error; an explicit path must exist.
fn load_config(path: &Path) -> Result<Config, gamelay::ConfigError> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        return Ok(Config::default());
    }
    Config::load(path)
}
