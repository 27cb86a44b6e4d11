//! Log destinations
//!
//! A [`SinkSet`] is an immutable snapshot of everything a log call needs:
//! the timestamp format plus at most one console sink and at most one file
//! sink. Reconfiguration builds a new snapshot and swaps it in whole.

mod console;
mod file;
mod rolling;

use std::io;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::record::Record;
use crate::template::TimestampFormat;

pub use console::{ConsoleSink, ConsoleWriters};
pub use file::FileSink;
pub use rolling::RollingFile;

/// A destination for rendered records
pub trait Sink: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Write one record
    fn write(&self, record: &Record<'_>) -> io::Result<()>;
}

/// Snapshot of the active sinks
#[derive(Clone, Default)]
pub struct SinkSet {
    pub(crate) timestamp: Option<TimestampFormat>,
    pub(crate) console: Option<Arc<ConsoleSink>>,
    pub(crate) file: Option<Arc<FileSink>>,
}

impl SinkSet {
    /// Snapshot with nothing attached
    pub fn empty() -> Self {
        Self::default()
    }

    /// Timestamp format, `None` when timestamps are disabled
    pub fn timestamp(&self) -> Option<&TimestampFormat> {
        self.timestamp.as_ref()
    }

    /// Active console sink
    pub fn console(&self) -> Option<&Arc<ConsoleSink>> {
        self.console.as_ref()
    }

    /// Active file sink
    pub fn file(&self) -> Option<&Arc<FileSink>> {
        self.file.as_ref()
    }

    /// Number of active sinks
    pub fn len(&self) -> usize {
        usize::from(self.console.is_some()) + usize::from(self.file.is_some())
    }

    /// Whether no sink is active
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active sinks in write order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Sink> + '_ {
        let console = self.console.as_deref().map(|s| s as &dyn Sink);
        let file = self.file.as_deref().map(|s| s as &dyn Sink);
        console.into_iter().chain(file)
    }

    /// Render the timestamp for `now`, if enabled
    pub fn stamp(&self, now: &OffsetDateTime) -> Option<String> {
        self.timestamp.as_ref().map(|format| format.render(now))
    }

    /// Write `record` to every active sink
    ///
    /// Write failures are left to the sinks; one failing sink does not stop
    /// the others.
    pub fn dispatch(&self, record: &Record<'_>) {
        for sink in self.iter() {
            let _ = sink.write(record);
        }
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSet")
            .field("timestamp", &self.timestamp)
            .field("console", &self.console.is_some())
            .field("file", &self.file.is_some())
            .finish()
    }
}
