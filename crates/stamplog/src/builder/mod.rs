//! Logger builder implementation
//!
//! This module is organized into:
//! - `reload`: Runtime filter reload logic

mod reload;

pub use reload::ReloadHandle;
pub(crate) use reload::{create_filter_layer, parse_filter};

use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{DEFAULT_LEVEL, Settings};
use crate::core::LogResult;
use crate::logger::Logger;
use crate::sink::ConsoleWriters;

/// Logger builder
pub struct LoggerBuilder {
    settings: Settings,
    clock: Arc<dyn Clock>,
    writers: ConsoleWriters,
}

impl LoggerBuilder {
    /// Builder with default settings, wall clock and stdio
    #[must_use]
    pub fn new() -> Self {
        Self::from_settings(Settings::default())
    }

    /// Create builder from settings
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
            writers: ConsoleWriters::stdio(),
        }
    }

    /// Replace the time source
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Share a time source with other components
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the console output streams
    pub fn console_writers(mut self, writers: ConsoleWriters) -> Self {
        self.writers = writers;
        self
    }

    /// Build the logger and apply the initial settings
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - File sink limits are invalid
    /// - The log folder cannot be created or opened
    pub fn build(self) -> LogResult<Logger> {
        let Self {
            mut settings,
            clock,
            writers,
        } = self;

        let level = settings
            .level
            .take()
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let filter = parse_filter(&level)?;

        let logger = Logger::assemble(filter, &level, clock, writers);
        logger.settings(settings)?;
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("settings", &self.settings)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
