//! File sink

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

use super::{RollingFile, Sink};
use crate::clock::Clock;
use crate::config::FileConfig;
use crate::core::{LogIoResultExt, LogResult};
use crate::record::Record;

/// Writes uncolored records to a [`RollingFile`]
pub struct FileSink {
    folder: PathBuf,
    writer: FileWriter,
}

enum FileWriter {
    Direct(Mutex<RollingFile>),
    /// Lines are queued to a worker thread; dropping the guard flushes them
    Buffered {
        writer: NonBlocking,
        _guard: WorkerGuard,
    },
}

impl FileSink {
    /// Open the sink. `config.folder` must already exist.
    pub fn open(config: &FileConfig, clock: Arc<dyn Clock>) -> LogResult<Self> {
        let rolling = RollingFile::open(config, clock).with_log_context(|| {
            format!("Failed to open log file in '{}'", config.folder.display())
        })?;

        let writer = if config.non_blocking {
            let (writer, guard) = NonBlockingBuilder::default()
                .lossy(false)
                .thread_name("stamplog-file")
                .finish(rolling);
            FileWriter::Buffered {
                writer,
                _guard: guard,
            }
        } else {
            FileWriter::Direct(Mutex::new(rolling))
        };

        Ok(Self {
            folder: config.folder.clone(),
            writer,
        })
    }

    /// Folder the sink writes into
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Whether writes go through a background worker
    pub fn is_non_blocking(&self) -> bool {
        matches!(self.writer, FileWriter::Buffered { .. })
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn write(&self, record: &Record<'_>) -> io::Result<()> {
        let line = format!("{record}\n");
        match &self.writer {
            FileWriter::Direct(rolling) => rolling.lock().write_line(line.as_bytes()),
            FileWriter::Buffered { writer, .. } => writer.clone().write_all(line.as_bytes()),
        }
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("folder", &self.folder)
            .field("non_blocking", &self.is_non_blocking())
            .finish()
    }
}
