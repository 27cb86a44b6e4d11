//! Field extraction for routed events

use std::fmt;

use tracing::field::{Field, Visit};

use crate::level::Level;

/// Event field carrying an explicit [`Level`] name
pub(crate) const SEVERITY_FIELD: &str = "severity";

const MESSAGE_FIELD: &str = "message";

/// Collects the message, severity and remaining fields of one event
#[derive(Debug, Default)]
pub(crate) struct EventFields {
    message: String,
    severity: Option<Level>,
    extra: Vec<(&'static str, String)>,
}

impl EventFields {
    /// Explicit severity, if the event carried a valid one
    pub(crate) fn severity(&self) -> Option<Level> {
        self.severity
    }

    /// Message followed by any other fields as `key=value`
    pub(crate) fn into_message(self) -> String {
        let mut message = self.message;
        for (name, value) in self.extra {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(name);
            message.push('=');
            message.push_str(&value);
        }
        message
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            MESSAGE_FIELD => self.message = value.to_string(),
            SEVERITY_FIELD => self.severity = value.parse().ok(),
            name => self.extra.push((name, value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            MESSAGE_FIELD => self.message = format!("{value:?}"),
            name => self.extra.push((name, format!("{value:?}"))),
        }
    }
}
