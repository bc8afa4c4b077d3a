use crate::workflows::listings::{FragmentSource, DEFAULT_PAGE_DELAY};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CSV_PREFIX: &str = "units_";
pub const DEFAULT_SHEET_NAME: &str = "Units";

/// Top-level configuration for a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub scrape: ScrapeConfig,
    pub proxy: ProxyConfig,
    pub csv: CsvOutputConfig,
    pub sheets: SheetsOutputConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let page_delay = match optional_var("SCRAPER_PAGE_DELAY_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidNumber {
                    key: "SCRAPER_PAGE_DELAY_SECS",
                    value: raw.clone(),
                }
            })?),
            None => DEFAULT_PAGE_DELAY,
        };
        let fragment_source = match optional_var("SCRAPER_FRAGMENT_SOURCE") {
            Some(raw) => raw
                .parse::<FragmentSource>()
                .map_err(|_| ConfigError::InvalidFragmentSource { value: raw.clone() })?,
            None => FragmentSource::default(),
        };

        let config = Self {
            telemetry: TelemetryConfig { log_level },
            scrape: ScrapeConfig {
                page_delay,
                fragment_source,
            },
            proxy: ProxyConfig {
                enabled: bool_var("SCRAPER_PROXY_ENABLED", false)?,
                url: optional_var("SCRAPER_PROXY_URL")
                    .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string()),
            },
            csv: CsvOutputConfig {
                enabled: bool_var("CSV_ENABLED", true)?,
                path_prefix: optional_var("CSV_PATH_PREFIX")
                    .unwrap_or_else(|| DEFAULT_CSV_PREFIX.to_string()),
            },
            sheets: SheetsOutputConfig {
                enabled: bool_var("SHEETS_ENABLED", false)?,
                file_id: optional_var("SHEETS_FILE_ID"),
                sheet_name: optional_var("SHEETS_SHEET_NAME")
                    .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
                credentials_path: optional_var("SHEETS_CREDENTIALS").map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks settings that depend on each other. Call again after applying
    /// command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proxy.enabled && self.proxy.url.trim().is_empty() {
            return Err(ConfigError::MissingSetting("SCRAPER_PROXY_URL"));
        }
        if self.sheets.enabled {
            if self.sheets.file_id.is_none() {
                return Err(ConfigError::MissingSetting("SHEETS_FILE_ID"));
            }
            if self.sheets.credentials_path.is_none() {
                return Err(ConfigError::MissingSetting("SHEETS_CREDENTIALS"));
            }
        }
        Ok(())
    }
}

/// Pacing and fragment selection for the listing fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub page_delay: Duration,
    pub fragment_source: FragmentSource,
}

/// Local debugging proxy. When enabled, certificate verification is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub enabled: bool,
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOutputConfig {
    pub enabled: bool,
    pub path_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsOutputConfig {
    pub enabled: bool,
    pub file_id: Option<String>,
    pub sheet_name: String,
    pub credentials_path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bool_var(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = optional_var(key) else {
        return Ok(default);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBool { key: &'static str, value: String },
    InvalidNumber { key: &'static str, value: String },
    InvalidFragmentSource { value: String },
    MissingSetting(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBool { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a whole number, got '{value}'")
            }
            ConfigError::InvalidFragmentSource { value } => write!(
                f,
                "SCRAPER_FRAGMENT_SOURCE must be 'text' or 'aria-label', got '{value}'"
            ),
            ConfigError::MissingSetting(key) => {
                write!(f, "{key} must be set for the enabled outputs")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
