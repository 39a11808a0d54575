//! Configuration management
//!
//! This module handles loading and parsing configuration for the question page.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page host configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Question API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Timestamp locale configuration
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Question view behavior
    #[serde(default)]
    pub view: ViewConfig,
    /// Template overrides
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Page host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Cookie carrying the signed-in user id
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_cookie: default_session_cookie(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_cookie() -> String {
    "user_id".to_string()
}

/// Question API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend driver (http or memory)
    #[serde(default)]
    pub driver: ApiDriver,
    /// Base URL the `/api/...` paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// JSON fixtures seeding the memory driver
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            driver: ApiDriver::default(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            fixtures: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Question API driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiDriver {
    /// Remote HTTP API (default)
    #[default]
    Http,
    /// In-process store, optionally seeded from fixtures
    Memory,
}

/// Locale used for relative timestamps and page labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    /// Brazilian Portuguese (default)
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// US English
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// BCP 47 tag, used for the `lang` attribute
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "pt-br" => Ok(Self::PtBr),
            "en-us" => Ok(Self::EnUs),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}

/// Locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale name
    #[serde(default)]
    pub name: Locale,
    /// Fixed UTC offset used to compute calendar days, in minutes
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            name: Locale::default(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

fn default_utc_offset() -> i32 {
    -180 // America/Sao_Paulo
}

/// What the view does with the draft when posting an answer fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Keep the draft, show the error, skip the reload (default)
    #[default]
    PreserveDraft,
    /// Clear the draft and reload whatever the outcome
    AlwaysClear,
}

impl std::str::FromStr for SubmitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve_draft" => Ok(Self::PreserveDraft),
            "always_clear" => Ok(Self::AlwaysClear),
            _ => Err(format!("Invalid submit policy: {}", s)),
        }
    }
}

/// Question view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Draft handling after a failed submit
    #[serde(default)]
    pub submit_policy: SubmitPolicy,
    /// Number of answer placeholders shown while loading
    #[serde(default = "default_skeleton_rows")]
    pub skeleton_rows: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            submit_policy: SubmitPolicy::default(),
            skeleton_rows: default_skeleton_rows(),
        }
    }
}

fn default_skeleton_rows() -> usize {
    5
}

/// Template override configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory whose `.html` files replace the built-in templates
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;
const MAX_SKELETON_ROWS: usize = 50;

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - QA_PAGE_SERVER_HOST
    /// - QA_PAGE_SERVER_PORT
    /// - QA_PAGE_SERVER_SESSION_COOKIE
    /// - QA_PAGE_API_DRIVER
    /// - QA_PAGE_API_BASE_URL
    /// - QA_PAGE_API_TIMEOUT_SECONDS
    /// - QA_PAGE_API_FIXTURES
    /// - QA_PAGE_LOCALE
    /// - QA_PAGE_LOCALE_UTC_OFFSET_MINUTES
    /// - QA_PAGE_SUBMIT_POLICY
    /// - QA_PAGE_THEME_PATH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the page unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.driver == ApiDriver::Http && self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url is required for the http driver".to_string(),
            ));
        }
        if self.locale.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "locale.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.locale.utc_offset_minutes
            )));
        }
        if self.view.skeleton_rows > MAX_SKELETON_ROWS {
            return Err(ConfigError::ValidationError(format!(
                "view.skeleton_rows must be at most {}",
                MAX_SKELETON_ROWS
            )));
        }
        Ok(())
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("QA_PAGE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("QA_PAGE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cookie) = std::env::var("QA_PAGE_SERVER_SESSION_COOKIE") {
            self.server.session_cookie = cookie;
        }

        // API configuration
        if let Ok(driver) = std::env::var("QA_PAGE_API_DRIVER") {
            match driver.to_lowercase().as_str() {
                "http" => self.api.driver = ApiDriver::Http,
                "memory" => self.api.driver = ApiDriver::Memory,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(base_url) = std::env::var("QA_PAGE_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("QA_PAGE_API_TIMEOUT_SECONDS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.api.timeout_seconds = timeout;
            }
        }
        if let Ok(fixtures) = std::env::var("QA_PAGE_API_FIXTURES") {
            self.api.fixtures = Some(PathBuf::from(fixtures));
        }

        // Locale configuration
        if let Ok(locale) = std::env::var("QA_PAGE_LOCALE") {
            if let Ok(locale) = locale.parse::<Locale>() {
                self.locale.name = locale;
            }
        }
        if let Ok(offset) = std::env::var("QA_PAGE_LOCALE_UTC_OFFSET_MINUTES") {
            if let Ok(offset) = offset.parse::<i32>() {
                self.locale.utc_offset_minutes = offset;
            }
        }

        // View configuration
        if let Ok(policy) = std::env::var("QA_PAGE_SUBMIT_POLICY") {
            if let Ok(policy) = policy.parse::<SubmitPolicy>() {
                self.view.submit_policy = policy;
            }
        }

        // Theme configuration
        if let Ok(path) = std::env::var("QA_PAGE_THEME_PATH") {
            self.theme.path = Some(PathBuf::from(path));
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test that touches QA_PAGE_* variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
