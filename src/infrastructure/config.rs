//! Configuration infrastructure
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `PLAY_SCRAPER__*` environment variables (`__` separates nested keys, e.g.
//! `PLAY_SCRAPER__HTTP__TIMEOUT_SECONDS=10`).

use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::SelectorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "play-store-scraper";

pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_PREFIX: &str = "PLAY_SCRAPER";

/// Default values
pub mod defaults {
    pub use crate::domain::constants::request::{DEFAULT_COUNTRY, DEFAULT_DELAY_MS, DEFAULT_LANG};

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "play-scraper.log";
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for the log file; platform data directory when unset
    pub log_dir: Option<PathBuf>,

    pub file_name: String,

    /// Per-target level overrides (e.g. "reqwest" = "warn")
    pub module_filters: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let module_filters = [("reqwest", "info"), ("hyper", "warn"), ("html5ever", "warn")]
            .into_iter()
            .map(|(target, level)| (target.to_string(), level.to_string()))
            .collect();

        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters,
        }
    }
}

/// Complete scraper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Minimum spacing between two request starts, in milliseconds
    pub delay_ms: u64,

    pub default_lang: String,

    pub default_country: String,

    pub http: HttpClientConfig,

    pub logging: LoggingConfig,

    pub selectors: SelectorConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::DEFAULT_DELAY_MS,
            default_lang: defaults::DEFAULT_LANG.to_string(),
            default_country: defaults::DEFAULT_COUNTRY.to_string(),
            http: HttpClientConfig::default(),
            logging: LoggingConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// `<config_dir>/play-store-scraper/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> ScraperResult<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    debug!("Looking for configuration at {}", default_path.display());
                    builder = builder.add_source(
                        config::File::from(default_path)
                            .format(config::FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScraperResult<()> {
        if !is_two_letter_code(&self.default_lang) {
            return Err(ScraperError::Config(format!(
                "default_lang must be a two-letter code, got {:?}",
                self.default_lang
            )));
        }
        if !is_two_letter_code(&self.default_country) {
            return Err(ScraperError::Config(format!(
                "default_country must be a two-letter code, got {:?}",
                self.default_country
            )));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ScraperError::Config(
                "http.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_two_letter_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ScraperConfig::default();
        assert_eq!(config.delay_ms, 1000);
        assert_eq!(config.default_lang, "en");
        assert_eq!(config.default_country, "us");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_are_layered_on_defaults() {
        let file = write_config(
            r#"
delay_ms = 250
default_lang = "fr"

[http]
timeout_seconds = 5

[selectors.list]
card = ".tile"
"#,
        );

        let config = ScraperConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.delay_ms, 250);
        assert_eq!(config.default_lang, "fr");
        assert_eq!(config.default_country, "us");
        assert_eq!(config.http.timeout_seconds, 5);
        assert!(config.http.follow_redirects);
        assert_eq!(config.selectors.list.card, ".tile");
        assert_eq!(config.selectors.list.title, "a.title");
    }

    #[test]
    fn test_invalid_locale_is_rejected() {
        let file = write_config("default_country = \"usa\"\n");
        let err = ScraperConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ScraperConfig::load(Some(&missing)),
            Err(ScraperError::Config(_))
        ));
    }
}
