//! Configuration management for `WeatherDesk`
//!
//! Settings come from an optional TOML file layered under `WEATHERDESK_`
//! environment variables, followed by defaults and validation.

use crate::WeatherDeskError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "weatherdesk.toml";

/// Environment variable honoured when no provider key is configured
pub const API_KEY_FALLBACK_VAR: &str = "OPENWEATHER_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherDeskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Frontend origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

/// Upstream weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the record database
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; span export is off when unset
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_provider_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_provider_timeout() -> u32 {
    10
}

fn default_storage_path() -> String {
    "data/weatherdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl WeatherDeskConfig {
    /// Load configuration from `config_path`, or `weatherdesk.toml` when `None`.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let required = config_path.is_some();
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if required && !config_file.exists() {
            return Err(WeatherDeskError::config(format!(
                "Config file not found: {}",
                config_file.display()
            ))
            .into());
        }

        builder = builder.add_source(
            File::from(config_file.as_path())
                .required(false)
                .format(config::FileFormat::Toml),
        );

        // WEATHERDESK_PROVIDER__API_KEY -> provider.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherDeskConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.fill_api_key(std::env::var(API_KEY_FALLBACK_VAR).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Use `fallback` as the provider key when none is configured
    pub fn fill_api_key(&mut self, fallback: Option<String>) {
        let configured = self
            .provider
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !configured {
            self.provider.api_key = fallback.filter(|key| !key.trim().is_empty());
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.cors_origin.is_empty() {
            self.server.cors_origin = default_cors_origin();
        }
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_provider_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_provider_timeout();
        }
        if self.storage.path.is_empty() {
            self.storage.path = default_storage_path();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self
            .logging
            .otlp_endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.trim().is_empty())
        {
            self.logging.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(
                WeatherDeskError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherDeskError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherDeskError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !is_http_url(&self.provider.base_url) {
            return Err(WeatherDeskError::config(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if !is_http_url(&self.server.cors_origin) {
            return Err(
                WeatherDeskError::config("CORS origin must be an HTTP or HTTPS URL").into(),
            );
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(WeatherDeskError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Storage path as a filesystem path
    #[must_use]
    pub fn storage_path(&self) -> &Path {
        Path::new(&self.storage.path)
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = WeatherDeskConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.cors_origin, "http://localhost:5173");
        assert_eq!(config.provider.base_url, "https://api.openweathermap.org");
        assert_eq!(config.provider.timeout_seconds, 10);
        assert_eq!(config.storage.path, "data/weatherdesk");
        assert_eq!(config.logging.level, "info");
        assert!(config.provider.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherDeskConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = WeatherDeskConfig::default();
        config.provider.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_urls() {
        let mut config = WeatherDeskConfig::default();
        config.provider.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = WeatherDeskConfig::default();
        config.logging.otlp_endpoint = Some("collector:4318".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = WeatherDeskConfig::default();
        config.server.port = 0;
        config.provider.timeout_seconds = 0;
        config.logging.format = String::new();
        config.logging.otlp_endpoint = Some("  ".to_string());

        config.apply_defaults();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.timeout_seconds, 10);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.otlp_endpoint.is_none());
    }

    #[test]
    fn test_api_key_fallback_only_when_unset() {
        let mut config = WeatherDeskConfig::default();
        config.fill_api_key(Some("from-env".to_string()));
        assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));

        config.fill_api_key(Some("other".to_string()));
        assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));

        let mut config = WeatherDeskConfig::default();
        config.fill_api_key(Some(String::new()));
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[provider]
api_key = "abc123"
timeout_seconds = 20

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = WeatherDeskConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.provider.timeout_seconds, 20);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.storage.path, "data/weatherdesk");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = WeatherDeskConfig::load_from_path(Some(PathBuf::from(
            "/definitely/not/here/weatherdesk.toml",
        )));
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }
}
