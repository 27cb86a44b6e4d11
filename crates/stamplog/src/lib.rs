//! # stamplog
//!
//! Leveled logging with decorated timestamps, colored console output and
//! daily rolling log files.
//!
//! ## Quick Start
//!
//! ```rust
//! use stamplog::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     stamplog::settings(Settings {
//!         console: Some(ConsoleSettings {
//!             timestamp_format: Some("HH:mm:ss".to_string()),
//!             timestamp_prefix: Some("<".to_string()),
//!             timestamp_suffix: Some(">".to_string()),
//!             ..ConsoleSettings::default()
//!         }),
//!         ..Settings::default()
//!     })?;
//!
//!     info!("listening on port {}", 8080);
//!     Ok(())
//! }
//! ```
//!
//! ## Timestamp templates
//!
//! A template mixes literal text with date tokens. Text inside `[...]` is
//! rendered as a date pattern and text outside is copied verbatim, so
//! `"Date: [YYYY-MM-DD]"` renders as `"Date: 2024-03-07"`. A template with no
//! closed bracket pair is one pattern as a whole.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod clock;
mod config;
pub mod core;
mod layer;
mod level;
mod logger;
mod macros;
mod record;
mod sink;
pub mod template;

use std::sync::LazyLock;

// Public API
pub use builder::{LoggerBuilder, ReloadHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConsoleConfig, ConsoleSettings, DEFAULT_FILES_NAME, DEFAULT_FOLDER, DEFAULT_LEVEL,
    DEFAULT_MAX_FILE, DEFAULT_MAX_SIZE, FileConfig, FileSettings, Retention, Settings, parse_size,
};
pub use core::{LogError, LogIoResultExt, LogResult};
pub use level::Level;
pub use logger::{Logger, TARGET};
pub use record::Record;
pub use sink::{ConsoleSink, ConsoleWriters, FileSink, RollingFile, Sink, SinkSet};
pub use template::{
    DEFAULT_TEMPLATE, Pattern, Segment, Template, TemplateMode, TimestampFormat, Token,
    format_timestamp,
};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConsoleSettings, FileSettings, Level, LogError, LogResult, Logger, Settings, auto_init,
        debug, error, info, init, init_with, log, log_error, warn,
    };
}

static GLOBAL: LazyLock<Logger> = LazyLock::new(Logger::new);

/// The process-wide logger used by the free functions and macros
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Log at the default `log` level on the global logger
pub fn log(message: impl AsRef<str>) {
    global().log(message);
}

/// Log an error on the global logger
pub fn error(message: impl AsRef<str>) {
    global().error(message);
}

/// Log a warning on the global logger
pub fn warn(message: impl AsRef<str>) {
    global().warn(message);
}

/// Log an informational message on the global logger
pub fn info(message: impl AsRef<str>) {
    global().info(message);
}

/// Log a debug message on the global logger
pub fn debug(message: impl AsRef<str>) {
    global().debug(message);
}

/// Apply settings to the global logger
///
/// # Errors
/// See [`Logger::settings`]
pub fn settings(settings: Settings) -> LogResult<()> {
    global().settings(settings)
}

// ============================================================================
// Initialization Functions
// ============================================================================

/// Guard returned by the `init` functions
///
/// Dropping it shuts the global logger down, which flushes buffered file
/// output.
#[derive(Debug)]
#[must_use = "dropping the guard shuts the global logger down"]
pub struct LoggerGuard {
    _private: (),
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        global().shutdown();
    }
}

/// Install the global logger with its default settings
///
/// # Errors
/// Returns error if another global `tracing` subscriber is installed
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Settings::default())
}

/// Apply `settings` to the global logger and install it as the process-wide
/// `tracing` subscriber
///
/// # Errors
/// Returns error if the settings are rejected or another global `tracing`
/// subscriber is installed
pub fn init_with(settings: Settings) -> LogResult<LoggerGuard> {
    let logger = global();
    logger.settings(settings)?;
    logger.install()?;
    Ok(LoggerGuard { _private: () })
}

/// Pick settings from the environment, falling back to the development or
/// production preset depending on the build profile
///
/// # Errors
/// See [`init_with`]
pub fn auto_init() -> LogResult<LoggerGuard> {
    let from_env = Settings::from_env();
    if !from_env.is_empty() {
        init_with(from_env)
    } else if cfg!(debug_assertions) {
        init_with(Settings::development())
    } else {
        init_with(Settings::production())
    }
}
