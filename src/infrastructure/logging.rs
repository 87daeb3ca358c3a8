//! Logging system configuration and initialization
//!
//! Console output goes to stderr so stdout stays free for results. An
//! optional non-blocking log file can be added. Filtering follows `RUST_LOG`
//! when set and the configured level otherwise. Timestamps are UTC.

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::Directive,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::APP_DIR;

// Keeps the file writer flushing for the life of the process
static LOG_GUARDS: Mutex<Vec<non_blocking::WorkerGuard>> = Mutex::new(Vec::new());

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

struct UtcTimeFormatter;

impl FormatTime for UtcTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Log directory used when the configuration names none
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    config.log_dir.clone().unwrap_or_else(default_log_directory)
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(LoggingConfig::default())
}

/// Build the level filter: `RUST_LOG` wins, otherwise the configured level
/// plus the per-target overrides.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in &config.module_filters {
            let directive: Directive = format!("{target}={level}")
                .parse()
                .with_context(|| format!("Invalid log filter {target}={level}"))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration.
///
/// Fails if no output is enabled or a global subscriber is already installed.
pub fn init_logging_with_config(config: LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;
    let log_dir = get_log_directory(&config);

    if config.file_output {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let (file_writer, guard) = non_blocking(rolling::never(&log_dir, &config.file_name));
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_timer(UtcTimeFormatter)
            .with_ansi(false);
        layers.push(if config.json_format {
            file_layer
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            file_layer.with_target(false).boxed()
        });
    }

    if config.console_output {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(UtcTimeFormatter)
                .with_target(false)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Logging already initialized: {e}"))?;

    if let Some(guard) = file_guard {
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(guard);
    }

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("Log file: {}", log_dir.join(&config.file_name).display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
        assert_eq!(config.module_filters.get("hyper").map(String::as_str), Some("warn"));
    }

    #[test]
    fn test_explicit_log_directory_wins() {
        let config = LoggingConfig {
            log_dir: Some(PathBuf::from("/tmp/scraper-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(get_log_directory(&config), PathBuf::from("/tmp/scraper-logs"));
        assert!(default_log_directory().ends_with("logs"));
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(config).is_err());
    }

    #[test]
    fn test_reinitialisation_is_an_error() {
        let _ = init_logging();
        assert!(init_logging().is_err());
    }
}
