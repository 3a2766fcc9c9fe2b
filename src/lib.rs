// SensorConsole
// Supplied without warranty.
// Use at your own risk.

//! Host-side logic for the STM32 water-quality sensor controller: a serial
//! session with a background poll loop that classifies the values the
//! controller streams back.

pub mod classifier;
pub mod command;
pub mod error;
pub mod export;
pub mod history;
pub mod poll;
pub mod ports;
pub mod quality;
pub mod session;
pub mod settings;
pub mod sink;
pub mod transport;

pub use classifier::{classify, Category, Reading};
pub use command::Command;
pub use error::{CommandError, ReadError, SessionError, SettingsError};
pub use session::{PortSession, SessionState};
pub use sink::{ChannelSink, LogLine, LogSink};
pub use transport::Transport;
