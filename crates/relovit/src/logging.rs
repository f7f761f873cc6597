//! Logging initialization.
//!
//! Built on `tracing`. Logs are either human-readable or one JSON object per
//! line, and always go to stderr so the enrichment report on stdout can be
//! piped straight into other tools.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - Log at DEBUG level (Gemini latencies, retries) instead of INFO.
/// * `json_format` - Emit structured JSON lines instead of pretty text.
///
/// # Notes
///
/// - Output goes to stderr; stdout carries the JSON report only
/// - `RUST_LOG` takes precedence over `verbose` when set
/// - Must be called at most once per process
pub fn init(verbose: bool, json_format: bool) {
    // RUST_LOG wins over the level picked from flags and config
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        // One JSON object per event, for log collectors
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Compact colored output for a terminal
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

/// Initialize logging from the `[logging]` section of the config file.
///
/// The `--verbose` and `--json-logs` flags can only turn options on, never
/// off: a config asking for `debug` stays at debug without `--verbose`.
pub fn init_from_config(
    config: &relovit_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let verbose = verbose_override || is_verbose_level(&config.logging.level);
    let json_format = json_logs_override || config.logging.format == "json";
    init(verbose, json_format);
}

fn is_verbose_level(level: &str) -> bool {
    matches!(level.to_lowercase().as_str(), "debug" | "trace")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_levels() {
        assert!(is_verbose_level("debug"));
        assert!(is_verbose_level("TRACE"));
        assert!(!is_verbose_level("info"));
        assert!(!is_verbose_level("warn"));
    }
}
