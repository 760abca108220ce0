//! Error types and handling for the `WeatherDesk` application

use thiserror::Error;

/// Stable machine-readable error codes surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    LocationNotFound,
    RecordNotFound,
    UpstreamError,
    StorageError,
    ConfigError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::LocationNotFound => "NOT_FOUND",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

/// Main error type for the `WeatherDesk` application
#[derive(Error, Debug)]
pub enum WeatherDeskError {
    /// Query or payload rejected before any upstream call
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Location resolution exhausted every strategy
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// A persisted record does not exist
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// Upstream provider failure (network, status, malformed body)
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Record store failures
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherDeskError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    pub fn record_not_found<S: Into<String>>(id: S) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            WeatherDeskError::InvalidInput { .. } => ErrorCode::InvalidInput,
            WeatherDeskError::LocationNotFound { .. } => ErrorCode::LocationNotFound,
            WeatherDeskError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            WeatherDeskError::Upstream { .. } => ErrorCode::UpstreamError,
            WeatherDeskError::Storage { .. } => ErrorCode::StorageError,
            WeatherDeskError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherDeskError::InvalidInput { message } => message.clone(),
            WeatherDeskError::LocationNotFound { .. } => "Location not found".to_string(),
            WeatherDeskError::RecordNotFound { .. } => "Record not found".to_string(),
            WeatherDeskError::Upstream { .. } => "Failed to fetch weather".to_string(),
            WeatherDeskError::Storage { .. } => "Failed to access saved records".to_string(),
            WeatherDeskError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
        }
    }
}

impl From<fjall::Error> for WeatherDeskError {
    fn from(err: fjall::Error) -> Self {
        WeatherDeskError::storage(err.to_string())
    }
}
