//! The process-wide logger, its macros and `init_with`
//!
//! Kept to a single test: the global logger and the global `tracing`
//! subscriber are shared by every test in this binary.

use std::fs;

use pretty_assertions::assert_eq;
use stamplog::prelude::*;

#[test]
fn global_logger_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("global");

    stamplog::settings(Settings {
        console: Some(ConsoleSettings {
            enable_timestamp: Some(false),
            colors: Some(false),
            ..ConsoleSettings::default()
        }),
        files: Some(FileSettings {
            folder: Some(folder.clone()),
            non_blocking: Some(true),
            ..FileSettings::default()
        }),
        ..Settings::default()
    })
    .unwrap();

    stamplog::log("plain");
    info!("listening on {}", 8080);
    let failure = log_error!(std::io::Error::other("disk full"), "flush failed");
    assert_eq!(failure.to_string(), "disk full");

    let guard = init_with(Settings {
        level: Some("info".to_string()),
        ..Settings::default()
    })
    .unwrap();
    assert_eq!(stamplog::global().current_filter().as_str(), "info");

    tracing::warn!(attempt = 2, "foreign event");
    debug!("filtered out");

    // A second install is rejected
    assert!(init().is_err());

    drop(guard);
    assert!(stamplog::global().sinks().is_empty());

    let entries: Vec<_> = fs::read_dir(&folder).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let contents = fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert_eq!(
        contents,
        "[log]: plain\n\
         [info]: listening on 8080\n\
         [error]: flush failed: disk full\n\
         [warn]: foreign event attempt=2\n"
    );
}
