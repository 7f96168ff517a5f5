//! Structured logging for Venera.
//!
//! Span-based, filterable logging via the `tracing` ecosystem: console output
//! with uptime timestamps and module paths, plus JSON file logging in debug
//! builds. The configured log level can override the built-in default filter.

use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use venera_config::Config;

/// Initialize the tracing subscriber.
///
/// Sets up a console layer with timestamps, module paths, and severity, and in
/// debug builds additionally writes JSON records to `venera.log` under
/// `log_dir`. `RUST_LOG` takes precedence; otherwise the config's
/// `debug.log_level` (when non-empty) or the default filter is used.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => default_filter_str().to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("venera.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The default filter string: `info` everywhere, with `wgpu`/`naga` clamped
/// to `warn` to keep shader-compiler chatter out of the console.
pub fn default_filter_str() -> &'static str {
    "info,wgpu=warn,naga=warn"
}

/// Create an [`EnvFilter`] with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(default_filter_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        let filter_str = format!("{}", filter);
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_config_level_overrides_default() {
        let mut config = Config::default();
        config.debug.log_level = "venera_height=trace".to_string();
        let chosen = if config.debug.log_level.is_empty() {
            default_filter_str().to_string()
        } else {
            config.debug.log_level.clone()
        };
        assert_eq!(chosen, "venera_height=trace");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,venera_render=trace",
            "warn,venera_rig=debug,venera_mesh=trace",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_file_logger_creation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path();
        std::fs::create_dir_all(log_path).unwrap();
        let log_file_path = log_path.join("venera.log");
        assert_eq!(log_file_path.file_name().unwrap(), "venera.log");
    }
}
