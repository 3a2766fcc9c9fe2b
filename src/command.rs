// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::str::FromStr;

use crate::error::CommandError;

/// Commands understood by the sensor controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Reset,
    Exit,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Start => "START",
            Command::Reset => "RESET",
            Command::Exit => "EXIT",
        }
    }

    /// Bytes put on the wire: the command followed by a newline.
    pub fn wire_bytes(self) -> Vec<u8> {
        format!("{}\n", self.as_str()).into_bytes()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    /// Trims and uppercases the input before matching.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = s.trim().to_uppercase();
        match command.as_str() {
            "" => Err(CommandError::Empty),
            "START" => Ok(Command::Start),
            "RESET" => Ok(Command::Reset),
            "EXIT" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(command)),
        }
    }
}
