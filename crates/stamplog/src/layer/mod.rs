//! `tracing` layer that feeds events into the active sinks

pub(crate) mod fields;

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::clock::Clock;
use crate::level::Level;
use crate::record::Record;
use crate::sink::SinkSet;
use fields::EventFields;

/// Routes every enabled event to the current [`SinkSet`] snapshot
pub(crate) struct SinkLayer {
    sinks: Arc<ArcSwap<SinkSet>>,
    clock: Arc<dyn Clock>,
}

impl SinkLayer {
    pub(crate) fn new(sinks: Arc<ArcSwap<SinkSet>>, clock: Arc<dyn Clock>) -> Self {
        Self { sinks, clock }
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let sinks = self.sinks.load();
        if sinks.is_empty() {
            return;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);
        let level = fields
            .severity()
            .unwrap_or_else(|| Level::from_tracing(*event.metadata().level()));
        let message = fields.into_message();

        let timestamp = sinks.stamp(&self.clock.now());
        let record = Record::new(level, &message).with_timestamp(timestamp.as_deref());
        sinks.dispatch(&record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ConsoleSettings;
    use crate::sink::{ConsoleSink, ConsoleWriters};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::io;
    use time::macros::datetime;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sink_set(buffer: &Buffer, timestamps: bool) -> SinkSet {
        let config = ConsoleSettings {
            enable_timestamp: Some(timestamps),
            timestamp_format: Some("[HH:mm:ss]".to_string()),
            colors: Some(false),
            ..ConsoleSettings::default()
        }
        .resolve();
        let buffer = buffer.clone();
        let writers = ConsoleWriters::single(move || buffer.clone());

        SinkSet {
            timestamp: config.timestamp_enabled.then(|| config.timestamp.clone()),
            console: Some(Arc::new(ConsoleSink::from_config(&config, writers))),
            file: None,
        }
    }

    fn output(buffer: &Buffer) -> String {
        String::from_utf8(buffer.0.lock().clone()).unwrap()
    }

    fn subscriber(sinks: SinkSet) -> impl Subscriber + Send + Sync {
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:05:03 UTC)));
        let layer = SinkLayer::new(Arc::new(ArcSwap::from_pointee(sinks)), clock);
        tracing_subscriber::registry().with(layer)
    }

    #[test]
    fn explicit_severity_wins() {
        let buffer = Buffer::default();
        tracing::subscriber::with_default(subscriber(sink_set(&buffer, true)), || {
            tracing::info!(severity = "log", "plain message");
            tracing::warn!("careful");
        });

        assert_eq!(
            output(&buffer),
            "09:05:03 [log]: plain message\n09:05:03 [warn]: careful\n"
        );
    }

    #[test]
    fn foreign_events_keep_their_fields() {
        let buffer = Buffer::default();
        tracing::subscriber::with_default(subscriber(sink_set(&buffer, false)), || {
            tracing::trace!(port = 8080, host = "localhost", "listening");
        });

        assert_eq!(output(&buffer), "[debug]: listening port=8080 host=localhost\n");
    }

    #[test]
    fn empty_sink_set_writes_nothing() {
        let buffer = Buffer::default();
        tracing::subscriber::with_default(subscriber(SinkSet::empty()), || {
            tracing::error!("dropped on the floor");
        });
        assert_eq!(output(&buffer), "");
    }
}
