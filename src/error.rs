// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::io;
use std::string::FromUtf8Error;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not open {port}: {source}")]
    ConnectionOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("already connected to {0}. Use Disconnect.")]
    AlreadyConnected(String),

    #[error("not connected")]
    NotConnected,

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("reading from serial: {0}")]
    Io(#[from] io::Error),

    #[error("decoding serial input: {0}")]
    Decode(#[from] FromUtf8Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Command cannot be empty.")]
    Empty,

    #[error("Invalid command '{0}'. Use 'START', 'RESET', or 'EXIT'.")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O: {0}")]
    Io(#[from] io::Error),

    #[error("settings format: {0}")]
    Json(#[from] serde_json::Error),
}
