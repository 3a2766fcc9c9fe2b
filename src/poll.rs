// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::classifier::Reading;
use crate::error::ReadError;
use crate::sink::{LogLine, LogSink};
use crate::transport::Transport;

/// Device handle shared between the UI thread and the polling worker.
pub type SharedPort = Arc<Mutex<Option<Box<dyn Transport>>>>;

/// Runs until `stop` is set. The lock is held for one check-and-read and
/// released before sleeping.
pub fn run(port: SharedPort, stop: Arc<AtomicBool>, sink: Arc<dyn LogSink>, interval: Duration) {
    log::debug!("poll loop started");

    while !stop.load(Ordering::Acquire) {
        let chunk = {
            let mut guard = port.lock().unwrap_or_else(PoisonError::into_inner);
            match guard.as_mut() {
                Some(transport) => read_chunk(&mut **transport),
                None => Ok(None),
            }
        };

        match chunk {
            Ok(Some(text)) => forward(&text, sink.as_ref()),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{e}");
                sink.append_line(LogLine::error(e));
            }
        }

        thread::sleep(interval);
    }

    log::debug!("poll loop stopped");
}

/// Read everything currently buffered and decode it as one chunk.
fn read_chunk(transport: &mut dyn Transport) -> Result<Option<String>, ReadError> {
    let available = transport.bytes_available()?;
    if available == 0 {
        return Ok(None);
    }
    let bytes = transport.read_available(available)?;
    Ok(Some(String::from_utf8(bytes)?))
}

fn forward(text: &str, sink: &dyn LogSink) {
    let token = text.trim();
    if token.is_empty() {
        return;
    }
    match Reading::classify(token) {
        Some(reading) => sink.append_line(LogLine::Reading(reading)),
        None => log::debug!("dropping unclassified token {token:?}"),
    }
}
