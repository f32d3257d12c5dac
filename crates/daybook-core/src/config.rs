use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";
const OMDB_API_KEY_ENV: &str = "OMDB_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// WeatherAPI settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// OMDb settings
    #[serde(default)]
    pub movies: MoviesConfig,
}

/// Which of the two todo conventions the store follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoFlavor {
    /// Append new todos, trim their text, persist a `status` string.
    #[default]
    Web,
    /// Prepend new todos, keep text as typed, persist a `completed` flag.
    Mobile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file backing the key-value store
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Key the todo collection is stored under
    #[serde(default = "default_todo_key")]
    pub todo_key: String,

    #[serde(default)]
    pub flavor: TodoFlavor,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daybook")
        .join("daybook.db")
}

fn default_todo_key() -> String {
    "todos".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            todo_key: default_todo_key(),
            flavor: TodoFlavor::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// WeatherAPI key. Leave empty to read WEATHER_API_KEY at startup.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

/// The key from the file, else the environment. Environment values are
/// never copied into the config, so `save` cannot write them to disk.
fn resolve_api_key(configured: &str, env_var: &str) -> String {
    if configured.is_empty() {
        std::env::var(env_var).unwrap_or_default()
    } else {
        configured.to_string()
    }
}

impl WeatherConfig {
    pub fn resolved_api_key(&self) -> String {
        resolve_api_key(&self.api_key, WEATHER_API_KEY_ENV)
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviesConfig {
    #[serde(default = "default_movies_base_url")]
    pub base_url: String,

    /// OMDb key. Leave empty to read OMDB_API_KEY at startup.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Quiet period before a typed query is sent
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Query used to fill the default list before the user searches
    #[serde(default = "default_popular_query")]
    pub popular_query: String,
}

fn default_movies_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_popular_query() -> String {
    "avengers".to_string()
}

impl MoviesConfig {
    pub fn resolved_api_key(&self) -> String {
        resolve_api_key(&self.api_key, OMDB_API_KEY_ENV)
    }
}

impl Default for MoviesConfig {
    fn default() -> Self {
        Self {
            base_url: default_movies_base_url(),
            api_key: String::new(),
            search_debounce_ms: default_search_debounce_ms(),
            popular_query: default_popular_query(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook");

        Self {
            config_dir,
            storage: StorageConfig::default(),
            http: HttpConfig::default(),
            weather: WeatherConfig::default(),
            movies: MoviesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("No config at {}, writing defaults", config_path.display());
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.storage.todo_key.trim().is_empty() {
            result.add_error("storage.todo_key", "Storage key cannot be empty");
        }

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        }

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(&self.movies.base_url, "movies.base_url", &mut result);

        if self.weather.resolved_api_key().is_empty() {
            result.add_warning(
                "weather.api_key",
                "WeatherAPI key not configured - weather lookups will fail",
            );
        }

        if self.movies.resolved_api_key().is_empty() {
            result.add_warning(
                "movies.api_key",
                "OMDb key not configured - movie search will fail",
            );
        }

        if self.movies.search_debounce_ms == 0 {
            result.add_warning(
                "movies.search_debounce_ms",
                "Search debounce disabled (0 ms) - every keystroke hits the API",
            );
        } else if self.movies.search_debounce_ms > 5000 {
            result.add_warning(
                "movies.search_debounce_ms",
                "Search debounce is longer than 5 seconds",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no platform config directory".to_string()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }
}
