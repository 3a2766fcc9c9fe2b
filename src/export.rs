// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::sink::LogLine;

pub const MAX_LOG_RECORDS: usize = 5000;

/// A log line stamped with local time when it reached the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: String,
    pub line: LogLine,
    /// Consecutive identical errors folded into this record.
    pub repeats: u32,
}

impl LogRecord {
    pub fn now(line: LogLine) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            line,
            repeats: 1,
        }
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.repeats > 1 {
            write!(f, "{} (x{})", self.line, self.repeats)
        } else {
            write!(f, "{}", self.line)
        }
    }
}

/// On-screen log. Oldest records roll off past `capacity`, and an error
/// identical to the previous record bumps its count instead of adding a line.
#[derive(Debug, Clone)]
pub struct LogBook {
    records: VecDeque<LogRecord>,
    capacity: usize,
}

impl Default for LogBook {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_RECORDS)
    }
}

impl LogBook {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, line: LogLine) {
        self.push_record(LogRecord::now(line));
    }

    pub fn push_record(&mut self, record: LogRecord) {
        if let Some(last) = self.records.back_mut() {
            if matches!(record.line, LogLine::Error(_)) && last.line == record.line {
                last.repeats += record.repeats;
                last.timestamp = record.timestamp;
                return;
            }
        }
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.records.iter()
    }

    /// The last `n` records, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogRecord> + '_ {
        self.records.iter().skip(self.records.len().saturating_sub(n))
    }
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a LogRecord>,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "Timestamp,Line")?;
    for record in records {
        writeln!(out, "{},{}", csv_field(&record.timestamp), csv_field(&record.to_string()))?;
    }
    out.flush()
}

pub fn export_csv<'a>(records: impl IntoIterator<Item = &'a LogRecord>, path: &Path) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    write_csv(records, io::BufWriter::new(file))?;
    log::info!("log exported to {}", path.display());
    Ok(())
}
