//! Error handling for domain-sweep
//!
//! Individual probe failures never surface here: they are folded into a
//! [`Verdict`](crate::types::Verdict). These errors cover configuration,
//! candidate sources, report output and the pool itself.

use thiserror::Error;

/// Main error type for domain-sweep
#[derive(Error, Debug, Clone)]
pub enum SweepError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Task submission failed: {message}")]
    Submission { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SweepError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            content,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a task submission error (the only error that aborts a sweep)
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error aborted a sweep that was already running
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Submission { .. } | Self::Internal { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your flags or .env file", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Serialization { message, .. } => {
                format!("❌ Serialization error: {}", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Submission { message } => {
                format!("❌ Could not schedule checks: {}\n💡 Try reducing --workers", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<reqwest::Error> for SweepError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("HTTP request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_builder() {
            Self::config(format!("Invalid HTTP client settings: {}", err))
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweepError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::SweepError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SweepError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::SweepError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SweepError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::SweepError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SweepError::internal(format!($fmt, $($arg)*))
    };
}
