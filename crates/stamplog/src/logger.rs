//! The logger context object

use std::fmt;
use std::fs;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::builder::{LoggerBuilder, ReloadHandle, create_filter_layer, parse_filter};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConsoleConfig, DEFAULT_LEVEL, Settings};
use crate::core::{LogError, LogIoResultExt, LogResult};
use crate::layer::SinkLayer;
use crate::level::Level;
use crate::sink::{ConsoleSink, ConsoleWriters, FileSink, SinkSet};

/// Target of every event emitted by a [`Logger`]
pub const TARGET: &str = "stamplog";

/// A leveled logger with a console sink and an optional rolling file sink
///
/// Each logger owns its own `tracing` dispatch, so several loggers can live
/// side by side without touching the process-wide subscriber until
/// [`Logger::install`] is called.
pub struct Logger {
    dispatch: Dispatch,
    sinks: Arc<ArcSwap<SinkSet>>,
    reload: ReloadHandle,
    clock: Arc<dyn Clock>,
    writers: ConsoleWriters,
    settings_lock: Mutex<()>,
}

impl Logger {
    /// Logger with default console settings writing to stdout/stderr
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(
            EnvFilter::new(DEFAULT_LEVEL),
            DEFAULT_LEVEL,
            Arc::new(SystemClock),
            ConsoleWriters::stdio(),
        )
    }

    /// Start building a customised logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(crate) fn assemble(
        filter: EnvFilter,
        level: &str,
        clock: Arc<dyn Clock>,
        writers: ConsoleWriters,
    ) -> Self {
        let console = ConsoleConfig::default();
        let initial = SinkSet {
            timestamp: console.timestamp_enabled.then(|| console.timestamp.clone()),
            console: Some(Arc::new(ConsoleSink::from_config(&console, writers.clone()))),
            file: None,
        };
        let sinks = Arc::new(ArcSwap::from_pointee(initial));

        let (filter_layer, reload) = create_filter_layer(filter, level);
        let subscriber = Registry::default()
            .with(filter_layer)
            .with(SinkLayer::new(Arc::clone(&sinks), Arc::clone(&clock)));

        Self {
            dispatch: Dispatch::new(subscriber),
            sinks,
            reload,
            clock,
            writers,
            settings_lock: Mutex::new(()),
        }
    }

    /// Log at the default `log` level
    pub fn log(&self, message: impl AsRef<str>) {
        self.emit(Level::Log, message.as_ref());
    }

    /// Log an error
    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref());
    }

    /// Log a warning
    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(Level::Warn, message.as_ref());
    }

    /// Log an informational message
    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::Info, message.as_ref());
    }

    /// Log a debug message
    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(Level::Debug, message.as_ref());
    }

    /// Log `message` at `level`
    pub fn emit(&self, level: Level, message: &str) {
        let severity = level.as_str();
        tracing::dispatcher::with_default(&self.dispatch, || match level.to_tracing() {
            tracing::Level::ERROR => tracing::error!(target: TARGET, severity, "{message}"),
            tracing::Level::WARN => tracing::warn!(target: TARGET, severity, "{message}"),
            tracing::Level::INFO => tracing::info!(target: TARGET, severity, "{message}"),
            tracing::Level::DEBUG => tracing::debug!(target: TARGET, severity, "{message}"),
            _ => tracing::trace!(target: TARGET, severity, "{message}"),
        });
    }

    /// Apply partial settings
    ///
    /// Every part present in `settings` is prepared before anything is
    /// swapped in, so a failing call leaves the logger as it was. Parts that
    /// are absent keep their current sink.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `level` is not a valid filter directive
    /// - `files.maxFile` or `files.maxSize` is malformed
    /// - The log folder cannot be created or the log file cannot be opened
    pub fn settings(&self, settings: Settings) -> LogResult<()> {
        if settings.is_empty() {
            return Ok(());
        }

        let _lock = self.settings_lock.lock();

        let filter = match settings.level.as_deref() {
            Some(source) => Some((source, parse_filter(source)?)),
            None => None,
        };

        let mut next = SinkSet::clone(&self.sinks.load());

        if let Some(console) = &settings.console {
            let config = console.resolve();
            next.timestamp = config.timestamp_enabled.then(|| config.timestamp.clone());
            next.console = Some(Arc::new(ConsoleSink::from_config(
                &config,
                self.writers.clone(),
            )));
        }

        if let Some(files) = &settings.files {
            let config = files.resolve()?;
            fs::create_dir_all(&config.folder).with_log_context(|| {
                format!("Failed to create log folder '{}'", config.folder.display())
            })?;
            next.file = Some(Arc::new(FileSink::open(&config, Arc::clone(&self.clock))?));
        }

        if let Some((source, filter)) = filter {
            self.reload.apply(source, filter)?;
        }

        if settings.console.is_some() || settings.files.is_some() {
            self.sinks.store(Arc::new(next));
        }

        Ok(())
    }

    /// Current sink snapshot
    pub fn sinks(&self) -> Arc<SinkSet> {
        self.sinks.load_full()
    }

    /// Current level filter directive
    pub fn current_filter(&self) -> Arc<String> {
        self.reload.current_filter()
    }

    /// Handle for changing the level filter without a full settings call
    pub fn reload_handle(&self) -> &ReloadHandle {
        &self.reload
    }

    /// The `tracing` dispatch this logger routes through
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's `tracing` default
    ///
    /// Plain `tracing` events emitted inside `f` reach this logger's sinks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the process-wide `tracing` subscriber
    ///
    /// # Errors
    /// Returns error if a global subscriber is already installed
    pub fn install(&self) -> LogResult<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| LogError::config(format!("Failed to install logger: {e}")))
    }

    /// Detach every sink, flushing buffered file output
    ///
    /// Later log calls are dropped until new settings are applied.
    pub fn shutdown(&self) {
        let _lock = self.settings_lock.lock();
        self.sinks.store(Arc::new(SinkSet::empty()));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sinks.load())
            .field("filter", &self.reload.current_filter())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
