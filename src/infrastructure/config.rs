//! Configuration infrastructure
//!
//! User agents, delay bounds, locale and file paths live in [`AppConfig`],
//! loaded once at startup and passed down explicitly.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. JSON config file
//! 3. `LISTING_SCOUT__SECTION__KEY` environment variables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::infrastructure::parsing::price_block_parser::MIN_PRICE_WINDOW_CHARS;
use crate::infrastructure::parsing::{ParsingConfig, ParsingError};

pub const ENV_PREFIX: &str = "LISTING_SCOUT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Configuration file I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration value '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("No user configuration directory available")]
    NoConfigDir,

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraping: ScrapingConfig,
    pub parsing: ParsingConfig,
    pub io: IoConfig,
    pub logging: LoggingConfig,
}

/// Navigation, pacing and request identity settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Product page URL; `{}` is replaced by the identifier
    pub product_url_template: String,

    /// Pool of user agents; one is picked at random per session
    pub user_agents: Vec<String>,

    /// Sent as Accept-Language
    pub locale: String,

    /// Navigation timeout in milliseconds
    pub navigation_timeout_ms: u64,

    /// Fixed settle delay after a page is fetched, in milliseconds
    pub settle_delay_ms: u64,

    /// Minimum body length for a page to count as ready
    pub min_content_length: usize,

    /// Hard ceiling on request rate
    pub max_requests_per_second: u32,

    /// Inter-item delay bounds in seconds, inclusive
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,

    /// Also pause between the search page and the product page of one item
    pub pause_before_product_page: bool,

    /// Emit a search-only record when the product page fetch fails
    pub emit_search_only_on_product_failure: bool,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            product_url_template: marketplace::PRODUCT_URL_TEMPLATE.to_string(),
            user_agents: defaults::USER_AGENTS.iter().map(ToString::to_string).collect(),
            locale: defaults::LOCALE.to_string(),
            navigation_timeout_ms: defaults::NAVIGATION_TIMEOUT_MS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            min_content_length: defaults::MIN_CONTENT_LENGTH,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            min_delay_secs: defaults::MIN_DELAY_SECS,
            max_delay_secs: defaults::MAX_DELAY_SECS,
            pause_before_product_page: true,
            emit_search_only_on_product_failure: false,
        }
    }
}

impl ScrapingConfig {
    pub fn product_url(&self, identifier: &str) -> String {
        self.product_url_template.replacen("{}", identifier, 1)
    }
}

/// Input and output dataset settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,

    /// Column holding each row's search page URL
    pub navigation_column: String,

    /// Columns that must exist in the input header
    pub required_columns: Vec<String>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(defaults::INPUT_PATH),
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
            navigation_column: defaults::NAVIGATION_COLUMN.to_string(),
            required_columns: vec![defaults::NAVIGATION_COLUMN.to_string()],
        }
    }
}

impl IoConfig {
    /// Required columns with the navigation column always included.
    pub fn effective_required_columns(&self) -> Vec<String> {
        let mut columns = self.required_columns.clone();
        if !columns
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(self.navigation_column.trim()))
        {
            columns.push(self.navigation_column.clone());
        }
        columns
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs in the file layer
    pub json_format: bool,

    pub console_output: bool,
    pub file_output: bool,

    /// Defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Number of log files to keep
    pub max_files: u32,

    /// Module-specific level overrides, e.g. "reqwest": "warn"
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: None,
            max_files: defaults::LOG_MAX_FILES,
            module_filters: HashMap::from([
                ("reqwest".to_string(), "warn".to_string()),
                ("hyper".to_string(), "warn".to_string()),
                ("html5ever".to_string(), "error".to_string()),
                ("selectors".to_string(), "warn".to_string()),
            ]),
        }
    }
}

impl AppConfig {
    /// Reject settings that would make the run meaningless before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scraping = &self.scraping;
        if scraping.min_delay_secs > scraping.max_delay_secs {
            return Err(ConfigError::invalid(
                "scraping.min_delay_secs",
                format!(
                    "minimum delay {}s exceeds maximum delay {}s",
                    scraping.min_delay_secs, scraping.max_delay_secs
                ),
            ));
        }
        if scraping.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "scraping.user_agents",
                "at least one user agent is required",
            ));
        }
        if !scraping.product_url_template.contains("{}") {
            return Err(ConfigError::invalid(
                "scraping.product_url_template",
                "template must contain a {} placeholder",
            ));
        }
        if scraping.max_requests_per_second == 0 {
            return Err(ConfigError::invalid(
                "scraping.max_requests_per_second",
                "must be greater than 0",
            ));
        }

        Url::parse(&self.parsing.site_origin).map_err(|e| ParsingError::InvalidOrigin {
            origin: self.parsing.site_origin.clone(),
            reason: e.to_string(),
        })?;
        if self.parsing.price_window_chars < MIN_PRICE_WINDOW_CHARS {
            return Err(ParsingError::WindowTooSmall {
                minimum: MIN_PRICE_WINDOW_CHARS,
                actual: self.parsing.price_window_chars,
            }
            .into());
        }

        if self.io.navigation_column.trim().is_empty() {
            return Err(ConfigError::invalid("io.navigation_column", "must not be empty"));
        }
        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::invalid("logging", "no logging output configured"));
        }
        Ok(())
    }

    pub fn site_origin(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.parsing.site_origin).map_err(|e| {
            ParsingError::InvalidOrigin {
                origin: self.parsing.site_origin.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default per-user config file
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(config_dir.join("listing-scout").join("config.json")))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load file + environment layers, writing defaults on first run.
    pub async fn load_config(&self) -> Result<AppConfig, ConfigError> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            debug!("Configuration file not found, creating default: {:?}", self.config_path);
            self.save_config(&AppConfig::default()).await?;
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(self.config_path.as_path())
                    .format(::config::FileFormat::Json),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.config_path.clone(),
                source,
            })?;

        debug!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }
}

/// Marketplace URLs
pub mod marketplace {
    /// Origin used to resolve relative result links
    pub const ORIGIN: &str = "https://www.amazon.com";

    /// Canonical product page, `{}` = identifier
    pub const PRODUCT_URL_TEMPLATE: &str = "https://www.amazon.com/dp/{}";
}

/// Default configuration values
pub mod defaults {
    /// Characters examined after a format label; a tuning constant
    pub const PRICE_WINDOW_CHARS: usize = 250;

    pub const USER_AGENTS: &[&str] = &[
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
        "Mozilla/5.0 (X11; Linux x86_64)",
    ];

    pub const LOCALE: &str = "en-US,en;q=0.9";

    pub const NAVIGATION_TIMEOUT_MS: u64 = 60_000;
    pub const SETTLE_DELAY_MS: u64 = 2_000;
    pub const MIN_CONTENT_LENGTH: usize = 512;
    pub const MAX_REQUESTS_PER_SECOND: u32 = 1;

    pub const MIN_DELAY_SECS: u64 = 5;
    pub const MAX_DELAY_SECS: u64 = 8;

    pub const INPUT_PATH: &str = "input/check.csv";
    pub const OUTPUT_PATH: &str = "output/selection_output.csv";
    pub const NAVIGATION_COLUMN: &str = "SEARCH_URL";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_MAX_FILES: u32 = 5;
}
