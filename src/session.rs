// SensorConsole
// Supplied without warranty.
// Use at your own risk.

//! One serial connection, from Connect to Disconnect.
//!
//! The device handle lives behind a single mutex shared with the polling
//! worker. Reads and writes each take the lock for one operation, so a write
//! may wait up to one poll interval but never interleaves with a read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::command::Command;
use crate::error::SessionError;
use crate::poll::{self, SharedPort};
use crate::sink::{LogLine, LogSink};
use crate::transport::Transport;

pub const BAUD_RATE: u32 = 115_200;
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const POLL_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

pub struct PortSession {
    port: SharedPort,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    port_name: Option<String>,
    sink: Arc<dyn LogSink>,
    poll_interval: Duration,
}

impl PortSession {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            port: Arc::new(Mutex::new(None)),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            port_name: None,
            sink,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.port_name.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    /// Open `port_name` at 115200 baud with a 1 s read timeout and start polling.
    pub fn open(&mut self, port_name: &str) -> Result<(), SessionError> {
        if let Some(current) = &self.port_name {
            return Err(SessionError::AlreadyConnected(current.clone()));
        }

        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| SessionError::ConnectionOpen {
                port: port_name.to_string(),
                source,
            })?;

        self.attach(port_name, Box::new(port))
    }

    /// Take ownership of an already open device and start polling it.
    pub fn attach(&mut self, port_name: &str, transport: Box<dyn Transport>) -> Result<(), SessionError> {
        if let Some(current) = &self.port_name {
            return Err(SessionError::AlreadyConnected(current.clone()));
        }

        *self.port.lock().unwrap_or_else(PoisonError::into_inner) = Some(transport);
        self.stop.store(false, Ordering::Release);

        let port = Arc::clone(&self.port);
        let stop = Arc::clone(&self.stop);
        let sink = Arc::clone(&self.sink);
        let interval = self.poll_interval;
        self.worker = Some(thread::spawn(move || poll::run(port, stop, sink, interval)));
        self.port_name = Some(port_name.to_string());

        log::info!("connected to {port_name} at {BAUD_RATE} baud");
        Ok(())
    }

    /// Send `command` followed by a newline. Blocks while the worker holds the lock.
    pub fn write(&self, command: Command) -> Result<(), SessionError> {
        let mut guard = self.port.lock().unwrap_or_else(PoisonError::into_inner);
        let transport = guard.as_mut().ok_or(SessionError::NotConnected)?;
        transport
            .send(&command.wire_bytes())
            .map_err(SessionError::Write)?;
        log::debug!("sent {command}");
        Ok(())
    }

    /// Validate free-text input from the command field and send it.
    /// Returns the line to show the user; invalid input never reaches the device.
    pub fn send_input(&self, input: &str) -> LogLine {
        let command = match input.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return LogLine::error(e),
        };
        match self.write(command) {
            Ok(()) => LogLine::Status(format!("Sent: {command}")),
            Err(e) => {
                log::warn!("{e}");
                LogLine::error(e)
            }
        }
    }

    /// Stop and join the worker, then release the device. Returns whether a
    /// connection was actually open.
    pub fn close(&mut self) -> bool {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("poll worker panicked");
            }
        }

        let was_open = self
            .port
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();

        if let Some(name) = self.port_name.take() {
            log::info!("closed {name}");
        }
        was_open
    }
}

impl Drop for PortSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Discard;

    impl LogSink for Discard {
        fn append_line(&self, _line: LogLine) {}
    }

    #[test]
    fn close_is_idempotent_when_never_opened() {
        let mut session = PortSession::new(Arc::new(Discard));
        assert!(!session.close());
        assert!(!session.close());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn write_without_connection_fails() {
        let session = PortSession::new(Arc::new(Discard));
        assert!(matches!(
            session.write(Command::Start),
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn opening_a_missing_device_is_a_connection_error() {
        let mut session = PortSession::new(Arc::new(Discard));
        let err = session.open("/dev/sensor-console-no-such-port").unwrap_err();
        assert!(matches!(err, SessionError::ConnectionOpen { .. }));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn invalid_input_is_reported_before_connection_check() {
        let session = PortSession::new(Arc::new(Discard));
        assert_eq!(
            session.send_input("").to_string(),
            "Error: Command cannot be empty."
        );
        assert_eq!(
            session.send_input("go").to_string(),
            "Error: Invalid command 'GO'. Use 'START', 'RESET', or 'EXIT'."
        );
        assert_eq!(session.send_input("start").to_string(), "Error: not connected");
    }
}
