//! Console sink

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use super::Sink;
use crate::config::ConsoleConfig;
use crate::record::Record;

/// Output streams for the console sink
///
/// `error` and `warn` records go to `err`, everything else to `out`.
#[derive(Clone)]
pub struct ConsoleWriters {
    out: Arc<BoxMakeWriter>,
    err: Arc<BoxMakeWriter>,
}

impl ConsoleWriters {
    /// Process stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout, io::stderr)
    }

    /// Custom streams
    pub fn new<O, E>(out: O, err: E) -> Self
    where
        O: for<'a> MakeWriter<'a> + Send + Sync + 'static,
        E: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            out: Arc::new(BoxMakeWriter::new(out)),
            err: Arc::new(BoxMakeWriter::new(err)),
        }
    }

    /// Send both streams to the same writer
    pub fn single<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
    {
        Self::new(writer.clone(), writer)
    }
}

impl Default for ConsoleWriters {
    fn default() -> Self {
        Self::stdio()
    }
}

impl fmt::Debug for ConsoleWriters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleWriters").finish_non_exhaustive()
    }
}

/// Writes records to stdout/stderr, optionally colorized per level
#[derive(Debug)]
pub struct ConsoleSink {
    colors: bool,
    writers: ConsoleWriters,
}

impl ConsoleSink {
    /// Create a sink writing to `writers`
    pub fn new(colors: bool, writers: ConsoleWriters) -> Self {
        Self { colors, writers }
    }

    /// Create a sink from resolved configuration
    pub fn from_config(config: &ConsoleConfig, writers: ConsoleWriters) -> Self {
        Self::new(config.colors, writers)
    }

    /// Whether lines are colorized
    pub fn colors(&self) -> bool {
        self.colors
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn write(&self, record: &Record<'_>) -> io::Result<()> {
        let mut writer = if record.level.is_stderr() {
            self.writers.err.make_writer()
        } else {
            self.writers.out.make_writer()
        };

        if self.colors {
            // Escape codes are written directly: `colored` would drop them
            // whenever stdout is not a terminal.
            writeln!(
                writer,
                "\x1b[{}m{record}\x1b[0m",
                record.level.color().to_fg_str()
            )
        } else {
            writeln!(writer, "{record}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn routes_by_severity() {
        let out = Buffer::default();
        let err = Buffer::default();
        let writers = {
            let (out, err) = (out.clone(), err.clone());
            ConsoleWriters::new(move || out.clone(), move || err.clone())
        };
        let sink = ConsoleSink::new(false, writers);

        for level in Level::ALL {
            sink.write(&Record::new(level, level.as_str())).unwrap();
        }

        assert_eq!(out.contents(), "[log]: log\n[info]: info\n[debug]: debug\n");
        assert_eq!(err.contents(), "[error]: error\n[warn]: warn\n");
    }

    #[test]
    fn colors_whole_line_per_level() {
        let buffer = Buffer::default();
        let writers = {
            let buffer = buffer.clone();
            ConsoleWriters::single(move || buffer.clone())
        };
        let sink = ConsoleSink::new(true, writers);
        assert!(sink.colors());

        sink.write(&Record::new(Level::Error, "boom")).unwrap();
        sink.write(&Record::new(Level::Info, "ready").with_timestamp(Some("09:05")))
            .unwrap();
        sink.write(&Record::new(Level::Log, "plain")).unwrap();

        assert_eq!(
            buffer.contents(),
            "\x1b[31m[error]: boom\x1b[0m\n\
             \x1b[36m09:05 [info]: ready\x1b[0m\n\
             \x1b[37m[log]: plain\x1b[0m\n"
        );
    }

    #[test]
    fn writes_timestamp_when_present() {
        let buffer = Buffer::default();
        let writers = {
            let buffer = buffer.clone();
            ConsoleWriters::single(move || buffer.clone())
        };
        let sink = ConsoleSink::new(false, writers);

        let record = Record::new(Level::Info, "ready").with_timestamp(Some("<09:05>"));
        sink.write(&record).unwrap();

        assert_eq!(buffer.contents(), "<09:05> [info]: ready\n");
        assert_eq!(sink.name(), "console");
    }
}
