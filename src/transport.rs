// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::io::{self, Read, Write};

use serialport::SerialPort;

/// Byte device a session talks to.
pub trait Transport: Send {
    /// Number of bytes buffered and ready to read, without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read exactly `n` bytes. Only called after `bytes_available` reported them.
    fn read_available(&mut self, n: usize) -> io::Result<Vec<u8>>;

    /// Write all of `bytes` and flush.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl Transport for Box<dyn SerialPort> {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let n = self.bytes_to_read()?;
        Ok(n as usize)
    }

    fn read_available(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0u8; n];
        Read::read_exact(self, &mut buffer)?;
        Ok(buffer)
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        Write::write_all(self, bytes)?;
        Write::flush(self)
    }
}
