//! Settings presets for common scenarios

use std::path::PathBuf;

use super::{ConsoleSettings, FileSettings, Settings};

impl Settings {
    /// Create settings from environment variables
    ///
    /// | Variable                     | Effect                         |
    /// |------------------------------|--------------------------------|
    /// | `STAMPLOG_LEVEL` / `RUST_LOG`| level filter                   |
    /// | `STAMPLOG_TIMESTAMP`         | `0`/`false` disables timestamps|
    /// | `STAMPLOG_TIMESTAMP_FORMAT`  | timestamp template             |
    /// | `STAMPLOG_TIMESTAMP_PREFIX`  | timestamp prefix               |
    /// | `STAMPLOG_TIMESTAMP_SUFFIX`  | timestamp suffix               |
    /// | `STAMPLOG_COLORS`            | `0`/`false` disables colors    |
    /// | `STAMPLOG_DIR`               | enables the file sink there    |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self {
            level: lookup("STAMPLOG_LEVEL").or_else(|| lookup("RUST_LOG")),
            ..Self::default()
        };

        let console = ConsoleSettings {
            enable_timestamp: lookup("STAMPLOG_TIMESTAMP").map(|v| is_truthy(&v)),
            timestamp_format: lookup("STAMPLOG_TIMESTAMP_FORMAT"),
            timestamp_prefix: lookup("STAMPLOG_TIMESTAMP_PREFIX"),
            timestamp_suffix: lookup("STAMPLOG_TIMESTAMP_SUFFIX"),
            colors: lookup("STAMPLOG_COLORS").map(|v| is_truthy(&v)),
        };
        if console != ConsoleSettings::default() {
            settings.console = Some(console);
        }

        if let Some(dir) = lookup("STAMPLOG_DIR") {
            settings.files = Some(FileSettings {
                folder: Some(PathBuf::from(dir)),
                ..FileSettings::default()
            });
        }

        settings
    }

    /// Development settings: colors on, short time-only timestamps
    #[must_use]
    pub fn development() -> Self {
        Self {
            console: Some(ConsoleSettings {
                timestamp_format: Some("HH:mm:ss.SSS".to_string()),
                colors: Some(true),
                ..ConsoleSettings::default()
            }),
            level: Some("debug".to_string()),
            ..Self::default()
        }
    }

    /// Production settings: plain console, info level, files under `logs/`
    #[must_use]
    pub fn production() -> Self {
        Self {
            console: Some(ConsoleSettings {
                colors: Some(false),
                ..ConsoleSettings::default()
            }),
            files: Some(FileSettings {
                zipped_archive: Some(true),
                ..FileSettings::default()
            }),
            level: Some("info".to_string()),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}
