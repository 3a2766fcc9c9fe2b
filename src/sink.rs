// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::sync::mpsc::Sender;

use crate::classifier::Reading;

/// One line of the on-screen log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Status(String),
    Error(String),
    Reading(Reading),
}

impl LogLine {
    pub fn status(text: impl Into<String>) -> Self {
        LogLine::Status(text.into())
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        LogLine::Error(err.to_string())
    }
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLine::Status(text) => f.write_str(text),
            LogLine::Error(msg) => write!(f, "Error: {msg}"),
            LogLine::Reading(reading) => write!(f, "{reading}"),
        }
    }
}

/// Destination for log lines. Called from the polling worker, so it must
/// not touch UI state directly.
pub trait LogSink: Send + Sync {
    fn append_line(&self, line: LogLine);
}

/// Forwards lines to the UI thread, which drains the receiving end on its tick.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<LogLine>,
}

impl ChannelSink {
    pub fn new(tx: Sender<LogLine>) -> Self {
        Self { tx }
    }
}

impl LogSink for ChannelSink {
    fn append_line(&self, line: LogLine) {
        // receiver gone means the UI is shutting down
        let _ = self.tx.send(line);
    }
}
