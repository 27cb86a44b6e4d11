//! Configuration types
//!
//! [`Settings`] is the partial, user-facing shape accepted by
//! [`Logger::settings`](crate::Logger::settings). Every field is optional;
//! missing fields take their defaults when a sub-object is resolved into a
//! [`ConsoleConfig`] or [`FileConfig`].

mod limits;
mod presets;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::LogResult;
use crate::template::{Template, TimestampFormat};

pub use limits::{Retention, parse_size};

/// Default log folder
pub const DEFAULT_FOLDER: &str = "logs";
/// Default file-name date pattern
pub const DEFAULT_FILES_NAME: &str = "YYYY-MM-DD";
/// Default retention
pub const DEFAULT_MAX_FILE: &str = "14d";
/// Default size limit per file
pub const DEFAULT_MAX_SIZE: &str = "20m";
/// Default level filter
pub const DEFAULT_LEVEL: &str = "debug";

/// Partial logger settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Replace the console sink
    pub console: Option<ConsoleSettings>,
    /// Replace the file sink
    pub files: Option<FileSettings>,
    /// Replace the level filter (e.g. "info", "debug,hyper=warn")
    pub level: Option<String>,
}

/// Console sink settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleSettings {
    /// Prepend a timestamp to each line (default true)
    pub enable_timestamp: Option<bool>,
    /// Timestamp template (default `YYYY-MM-DD HH:mm:ss`)
    pub timestamp_format: Option<String>,
    /// Literal text before the timestamp
    pub timestamp_prefix: Option<String>,
    /// Literal text after the timestamp
    pub timestamp_suffix: Option<String>,
    /// Colorize lines (default: on when stdout is a terminal)
    pub colors: Option<bool>,
}

/// File sink settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSettings {
    /// Folder holding the log files (default `logs`)
    pub folder: Option<PathBuf>,
    /// Date pattern used in file names (default `YYYY-MM-DD`)
    pub files_name: Option<String>,
    /// Retention: `"14d"` for days, `"10"` for a file count
    pub max_file: Option<String>,
    /// Size limit per file, e.g. `"20m"`
    pub max_size: Option<String>,
    /// Gzip files when rotating away from them
    pub zipped_archive: Option<bool>,
    /// Hand writes to a background worker
    pub non_blocking: Option<bool>,
}

/// Resolved console configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Prepend timestamps
    pub timestamp_enabled: bool,
    /// Template plus decoration
    pub timestamp: TimestampFormat,
    /// Colorize lines
    pub colors: bool,
}

/// Resolved file sink configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    /// Target folder
    pub folder: PathBuf,
    /// Date pattern rendered into file names
    pub files_name: Template,
    /// Retention policy
    pub retention: Retention,
    /// Size limit per file in bytes
    pub max_size: u64,
    /// Gzip rotated files
    pub zipped_archive: bool,
    /// Buffer writes on a worker thread
    pub non_blocking: bool,
}

impl Settings {
    /// Whether applying these settings would change nothing
    pub fn is_empty(&self) -> bool {
        self.console.is_none() && self.files.is_none() && self.level.is_none()
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> LogResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::core::LogError::config(format!("invalid settings JSON: {e}")))
    }
}

impl ConsoleSettings {
    /// Fill in defaults
    pub fn resolve(&self) -> ConsoleConfig {
        let template = Template::parse(self.timestamp_format.as_deref().unwrap_or_default());
        let timestamp = TimestampFormat::new(template)
            .with_prefix(self.timestamp_prefix.clone().unwrap_or_default())
            .with_suffix(self.timestamp_suffix.clone().unwrap_or_default());

        ConsoleConfig {
            timestamp_enabled: self.enable_timestamp.unwrap_or(true),
            timestamp,
            colors: self.colors.unwrap_or_else(default_colors),
        }
    }
}

impl FileSettings {
    /// Fill in defaults and parse limits
    pub fn resolve(&self) -> LogResult<FileConfig> {
        let files_name = match self.files_name.as_deref() {
            Some(pattern) if !pattern.is_empty() => pattern,
            _ => DEFAULT_FILES_NAME,
        };

        Ok(FileConfig {
            folder: self
                .folder
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER)),
            files_name: Template::parse(files_name),
            retention: self.max_file.as_deref().unwrap_or(DEFAULT_MAX_FILE).parse()?,
            max_size: parse_size(self.max_size.as_deref().unwrap_or(DEFAULT_MAX_SIZE))?,
            zipped_archive: self.zipped_archive.unwrap_or(false),
            non_blocking: self.non_blocking.unwrap_or(false),
        })
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleSettings::default().resolve()
    }
}

fn default_colors() -> bool {
    cfg!(feature = "ansi") && std::io::IsTerminal::is_terminal(&std::io::stdout())
}
