//! Log severities

use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::core::LogError;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// General output with no particular severity
    Log,
    /// Error level
    Error,
    /// Warn level
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
}

impl Level {
    /// All severities
    pub const ALL: [Self; 5] = [Self::Log, Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Lowercase name written into log lines
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Console color
    pub fn color(self) -> Color {
        match self {
            Self::Log => Color::White,
            Self::Error => Color::Red,
            Self::Warn => Color::Yellow,
            Self::Info => Color::Cyan,
            Self::Debug => Color::Magenta,
        }
    }

    /// Whether console output goes to stderr
    pub fn is_stderr(self) -> bool {
        matches!(self, Self::Error | Self::Warn)
    }

    /// `tracing` level used when routing the record
    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Log | Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
        }
    }

    /// Severity for an event that carries no explicit one
    pub fn from_tracing(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LogError::config(format!("unknown severity '{s}'")))
    }
}
