// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use sensor_console::{Category, Command, LogLine, LogSink, PortSession, SessionError, SessionState, Transport};

const INTERVAL: Duration = Duration::from_millis(5);

#[derive(Default)]
struct DeviceState {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
    events: Vec<&'static str>,
    reads: usize,
    read_delay: Duration,
    fail_next_read: bool,
}

/// In-memory device; clones share state so tests can inspect it after
/// handing one to the session.
#[derive(Clone, Default)]
struct MockDevice(Arc<Mutex<DeviceState>>);

impl MockDevice {
    fn feed(&self, bytes: &[u8]) {
        self.0.lock().unwrap().incoming.extend(bytes.iter().copied());
    }

    fn pending(&self) -> usize {
        self.0.lock().unwrap().incoming.len()
    }

    fn reads(&self) -> usize {
        self.0.lock().unwrap().reads
    }

    fn written(&self) -> Vec<u8> {
        self.0.lock().unwrap().written.clone()
    }

    fn events(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().events.clone()
    }
}

impl Transport for MockDevice {
    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.pending())
    }

    fn read_available(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let delay = {
            let mut s = self.0.lock().unwrap();
            s.events.push("read-start");
            s.read_delay
        };
        thread::sleep(delay);

        let mut s = self.0.lock().unwrap();
        s.reads += 1;
        s.events.push("read-end");
        if s.fail_next_read {
            s.fail_next_read = false;
            s.incoming.clear();
            return Err(io::Error::new(io::ErrorKind::Other, "device unplugged"));
        }
        Ok(s.incoming.drain(..n).collect())
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut s = self.0.lock().unwrap();
        s.events.push("write");
        s.written.extend_from_slice(bytes);
        Ok(())
    }
}

#[derive(Default)]
struct CollectSink(Mutex<Vec<LogLine>>);

impl CollectSink {
    fn rendered(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(ToString::to_string).collect()
    }
}

impl LogSink for CollectSink {
    fn append_line(&self, line: LogLine) {
        self.0.lock().unwrap().push(line);
    }
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

fn connected() -> (PortSession, MockDevice, Arc<CollectSink>) {
    let sink = Arc::new(CollectSink::default());
    let device = MockDevice::default();
    let mut session = PortSession::new(sink.clone()).with_poll_interval(INTERVAL);
    session.attach("mock0", Box::new(device.clone())).unwrap();
    (session, device, sink)
}

/// Feed one chunk and wait until the worker has consumed it.
fn feed_chunk(device: &MockDevice, bytes: &[u8]) {
    let before = device.reads();
    device.feed(bytes);
    assert!(wait_until(|| device.reads() > before && device.pending() == 0));
}

#[test]
fn readings_are_classified_end_to_end() {
    let (mut session, device, sink) = connected();

    feed_chunk(&device, b"12.34\r\n");
    feed_chunk(&device, b"7.2\r\n");
    feed_chunk(&device, b"4821\r\n");
    feed_chunk(&device, b"123.4\r\n");
    feed_chunk(&device, b"  \r\n");
    assert!(session.close());

    assert_eq!(
        sink.rendered(),
        vec![
            "Turbidity Data: 12.34 NTU",
            "DoLevel Data: 7.2 mg/L",
            "Microplastic Data: 4821 particles/L",
        ]
    );
}

#[test]
fn buffered_bytes_are_one_token() {
    let (mut session, device, sink) = connected();

    // whatever is buffered is decoded and classified as a single chunk
    feed_chunk(&device, b"12.3\r\n45.6\r\n");
    session.close();

    let lines = sink.0.lock().unwrap().clone();
    assert_eq!(lines.len(), 1);
    match &lines[0] {
        LogLine::Reading(r) => {
            assert_eq!(r.category, Category::Turbidity);
            assert_eq!(r.token, "12.3\r\n45.6");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn commands_are_newline_terminated_on_the_wire() {
    let (mut session, device, _sink) = connected();

    session.write(Command::Start).unwrap();
    assert_eq!(session.send_input(" reset ").to_string(), "Sent: RESET");
    session.close();

    assert_eq!(device.written(), b"START\nRESET\n");
}

#[test]
fn invalid_commands_never_reach_the_device() {
    let (mut session, device, _sink) = connected();

    for input in ["", "   ", "stop", "START NOW", "exit!"] {
        let line = session.send_input(input);
        assert!(matches!(line, LogLine::Error(_)), "{input:?} gave {line:?}");
    }
    session.close();

    assert!(device.written().is_empty());
    assert!(!device.events().contains(&"write"));
}

#[test]
fn write_waits_for_an_in_progress_read() {
    let (mut session, device, _sink) = connected();
    device.0.lock().unwrap().read_delay = Duration::from_millis(100);

    device.feed(b"7.2");
    assert!(wait_until(|| device.events().contains(&"read-start")));
    session.write(Command::Exit).unwrap();
    session.close();

    let events = device.events();
    let write_at = events.iter().position(|e| *e == "write").unwrap();
    let read_end = events.iter().position(|e| *e == "read-end").unwrap();
    assert!(read_end < write_at, "write interleaved with read: {events:?}");
    assert_eq!(device.written(), b"EXIT\n");
}

#[test]
fn lock_is_released_while_the_worker_sleeps() {
    let sink = Arc::new(CollectSink::default());
    let device = MockDevice::default();
    let interval = Duration::from_millis(800);
    let mut session = PortSession::new(sink.clone()).with_poll_interval(interval);
    session.attach("mock0", Box::new(device.clone())).unwrap();

    // first iteration finds nothing buffered and goes straight to sleep
    thread::sleep(Duration::from_millis(100));

    let started = Instant::now();
    session.write(Command::Start).unwrap();
    let waited = started.elapsed();
    assert!(waited < Duration::from_millis(200), "write waited {waited:?}");
    assert_eq!(device.written(), b"START\n");

    session.close();
}

#[test]
fn nothing_is_read_after_close_returns() {
    let (mut session, device, sink) = connected();

    feed_chunk(&device, b"7.2");
    assert!(session.close());
    assert_eq!(session.state(), SessionState::Disconnected);

    let reads = device.reads();
    let lines = sink.rendered().len();
    device.feed(b"12.34");
    thread::sleep(INTERVAL * 10);

    assert_eq!(device.reads(), reads);
    assert_eq!(sink.rendered().len(), lines);
    assert_eq!(device.pending(), 5);
    assert!(matches!(session.write(Command::Start), Err(SessionError::NotConnected)));
}

#[test]
fn close_is_idempotent() {
    let (mut session, _device, _sink) = connected();
    assert!(session.close());
    assert!(!session.close());
}

#[test]
fn read_errors_are_logged_and_polling_continues() {
    let (mut session, device, sink) = connected();

    device.0.lock().unwrap().fail_next_read = true;
    feed_chunk(&device, b"garbage");
    feed_chunk(&device, b"7.2");
    session.close();

    assert_eq!(
        sink.rendered(),
        vec![
            "Error: reading from serial: device unplugged".to_string(),
            "DoLevel Data: 7.2 mg/L".to_string(),
        ]
    );
}

#[test]
fn undecodable_bytes_are_logged_and_polling_continues() {
    let (mut session, device, sink) = connected();

    feed_chunk(&device, &[0x31, 0xff, 0x2e]);
    feed_chunk(&device, b"4821");
    session.close();

    let lines = sink.rendered();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error: decoding serial input"), "{}", lines[0]);
    assert_eq!(lines[1], "Microplastic Data: 4821 particles/L");
}

#[test]
fn only_one_connection_at_a_time() {
    let (mut session, _device, _sink) = connected();

    let err = session.attach("mock1", Box::new(MockDevice::default())).unwrap_err();
    assert!(matches!(err, SessionError::AlreadyConnected(ref p) if p == "mock0"));
    assert_eq!(session.port_name(), Some("mock0"));
    session.close();
}

#[test]
fn session_can_reconnect_after_disconnect() {
    let (mut session, first, sink) = connected();
    feed_chunk(&first, b"12.34");
    session.close();

    let second = MockDevice::default();
    session.attach("mock1", Box::new(second.clone())).unwrap();
    assert_eq!(session.state(), SessionState::Connected);
    feed_chunk(&second, b"4821");
    session.close();

    assert_eq!(sink.rendered().len(), 2);
}

#[test]
fn dropping_the_session_stops_the_worker() {
    let (session, device, _sink) = connected();
    drop(session);

    let reads = device.reads();
    device.feed(b"7.2");
    thread::sleep(INTERVAL * 10);
    assert_eq!(device.reads(), reads);
}
