//! Binary entry point: config, logging, then the window loop.

use std::path::PathBuf;

use venera_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse_args();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    venera_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = venera_app::run(config) {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("venera"))
        .unwrap_or_else(|| PathBuf::from("."))
}
