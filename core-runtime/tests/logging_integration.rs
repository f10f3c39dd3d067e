//! Integration tests for the global logging setup
//!
//! A process can only install one global subscriber, so everything that
//! needs it lives in a single test.

use bridge_traits::error::Result as SinkResult;
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use core_runtime::error::Error;
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LoggerSink for CapturingSink {
    fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_global_logging_forwards_plugin_events() {
    let sink = Arc::new(CapturingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config).unwrap();

    let path = "/home/user/mods/2nd_pm.s3m";
    tracing::debug!(target: "core_playback", file = strip_path(path), "Module opened");
    tracing::debug!(target: "some_other_crate", "Filtered out at warn");
    tracing::trace!(target: "core_playback", "Below the sink level");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Module opened");
        assert_eq!(entries[0].target, "core_playback");
        assert_eq!(
            entries[0].fields.get("file").map(String::as_str),
            Some("2nd_pm.s3m")
        );
    }

    let second = init_logging(LoggingConfig::default());
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
