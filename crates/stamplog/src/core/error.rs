//! Error type for logger configuration and setup.
//!
//! Only configuration-time operations fail. Log calls never return errors:
//! template problems degrade to literal output and sink write failures are
//! dropped by the sink layer.

use std::io;

/// Result alias for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building or reconfiguring a logger
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Invalid configuration value (size, retention, duplicate install, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filter directive could not be parsed
    #[error("Invalid filter: {0}")]
    Filter(String),

    /// Filesystem failure, with the operation that triggered it
    #[error("{context}: {source}")]
    Io {
        /// What the logger was doing
        context: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error was caused by caller-supplied configuration
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Filter(_))
    }
}

impl From<io::Error> for LogError {
    fn from(source: io::Error) -> Self {
        Self::Io {
            context: "IO error".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_client_errors() {
        let error = LogError::config("maxSize 'abc' is not a size");
        assert!(error.is_client_error());
        assert_eq!(
            error.to_string(),
            "Configuration error: maxSize 'abc' is not a size"
        );

        let error = LogError::Filter("debug,=".to_string());
        assert!(error.is_client_error());
        assert!(error.to_string().starts_with("Invalid filter"));
    }

    #[test]
    fn io_errors_keep_source() {
        let error: LogError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(!error.is_client_error());
        assert_eq!(error.to_string(), "IO error: denied");
        assert!(std::error::Error::source(&error).is_some());
    }
}
