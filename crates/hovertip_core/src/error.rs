//! Error types for Hovertip.
//!
//! Scheduling itself never fails. Errors only surface while building the
//! scheduler: loading configuration, creating directories, starting the
//! waiter runtime.

use thiserror::Error;

/// Main error type for Hovertip.
#[derive(Debug, Error)]
pub enum HovertipError {
    /// Configuration is malformed or inconsistent.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
    },

    /// Reading or writing local files failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The background runtime that hosts waiters could not be started.
    #[error("Runtime error: {message}")]
    Runtime {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HovertipError {
    // ========== Constructors ==========

    /// Create a new config error with a custom hint.
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config { message: message.into(), hint: Some(hint.into()) }
    }

    /// Create a new storage error.
    pub fn storage(message: impl Into<String>, hint: Option<&str>) -> Self {
        Self::Storage { message: message.into(), hint: hint.map(String::from), source: None }
    }

    /// Create a new runtime error with source.
    pub fn runtime(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Runtime { message: message.into(), source: Some(Box::new(source)) }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Config",
            Self::Storage { .. } => "Storage",
            Self::Runtime { .. } => "Runtime",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            Self::Storage { hint, .. } => hint.as_deref(),
            Self::Runtime { .. } => Some("Check available threads and system resources"),
        }
    }
}

// ========== Error Conversions ==========

/// Convert from std::io::Error to HovertipError.
impl From<std::io::Error> for HovertipError {
    fn from(err: std::io::Error) -> Self {
        HovertipError::Storage {
            message: err.to_string(),
            hint: Some("Check file permissions and disk space".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_json::Error to HovertipError.
impl From<serde_json::Error> for HovertipError {
    fn from(err: serde_json::Error) -> Self {
        HovertipError::Config {
            message: format!("JSON error: {err}"),
            hint: Some("Check the tooltip settings file for syntax errors".to_string()),
        }
    }
}
