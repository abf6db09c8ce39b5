//! Logging initialization.
//!
//! Uses the `tracing` ecosystem; the level comes from the `[logging]`
//! config section (overridable by `--verbose` and `RUST_LOG`), the format
//! from config or `--json-logs`.

use curator_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Effective filter directive and JSON flag after applying CLI overrides
/// to the `[logging]` config section.
///
/// `--verbose` forces `debug`; otherwise the configured level string is
/// used as-is, so `warn`, `error`, and `trace` all take effect. An
/// unrecognized level falls back to `info`.
fn resolve(config: &Config, verbose_override: bool, json_logs_override: bool) -> (&'static str, bool) {
    let level = if verbose_override {
        "debug"
    } else {
        match config.logging.level.as_str() {
            "error" => "error",
            "warn" => "warn",
            "info" => "info",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        }
    };
    let json = json_logs_override || config.logging.format == "json";
    (level, json)
}

/// Initialize the logging subsystem from configuration.
///
/// Log output goes to stderr; stdout is reserved for the run summary.
/// The `RUST_LOG` environment variable overrides the configured level.
pub fn init_from_config(config: &Config, verbose_override: bool, json_logs_override: bool) {
    let (level, json) = resolve(config, verbose_override, json_logs_override);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        // JSON format for machine parsing
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty format for humans
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_configured_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();
        assert_eq!(resolve(&config, false, false), ("warn", false));

        config.logging.level = "trace".to_string();
        assert_eq!(resolve(&config, false, false), ("trace", false));
    }

    #[test]
    fn test_resolve_verbose_overrides_level() {
        let mut config = Config::default();
        config.logging.level = "error".to_string();
        assert_eq!(resolve(&config, true, false), ("debug", false));
    }

    #[test]
    fn test_resolve_unknown_level_falls_back_to_info() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert_eq!(resolve(&config, false, false), ("info", false));
    }

    #[test]
    fn test_resolve_json_from_config_or_flag() {
        let mut config = Config::default();
        config.logging.format = "json".to_string();
        assert_eq!(resolve(&config, false, false).1, true);

        config.logging.format = "pretty".to_string();
        assert_eq!(resolve(&config, false, true).1, true);
        assert_eq!(resolve(&config, false, false).1, false);
    }
}
