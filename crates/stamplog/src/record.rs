//! A single log record as handed to sinks

use std::fmt;

use crate::level::Level;

/// An emitted record: severity, message and the rendered timestamp, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Severity
    pub level: Level,
    /// Message text
    pub message: &'a str,
    /// Rendered timestamp, absent when timestamps are disabled
    pub timestamp: Option<&'a str>,
}

impl<'a> Record<'a> {
    /// Record without a timestamp
    pub fn new(level: Level, message: &'a str) -> Self {
        Self {
            level,
            message,
            timestamp: None,
        }
    }

    /// Attach a rendered timestamp
    pub fn with_timestamp(mut self, timestamp: Option<&'a str>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// `<timestamp> [<level>]: <message>`, or `[<level>]: <message>`
impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(timestamp) = self.timestamp {
            write!(f, "{timestamp} ")?;
        }
        write!(f, "[{}]: {}", self.level, self.message)
    }
}
